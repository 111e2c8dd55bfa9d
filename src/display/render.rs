use super::error::TreeError;
use super::tree::DisplayTree;

/// How plain source text is laid into the code panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tokenize {
    /// One text unit holding the whole source.
    #[default]
    Plain,
    /// Identifier and number runs each get their own inline wrapper.
    Words,
}

/// Renders `source` as `div > pre > code#code_id`.
pub fn render_source(
    source: &str,
    code_id: &str,
    wrapper_tag: &str,
    mode: Tokenize,
) -> Result<DisplayTree, TreeError> {
    let mut tree = DisplayTree::new("div");
    let pre = tree.append_container(tree.root(), "pre")?;
    let code = tree.append_container(pre, "code")?;
    tree.set_id(code, code_id)?;

    match mode {
        Tokenize::Plain => {
            if !source.is_empty() {
                tree.append_text(code, source)?;
            }
        }
        Tokenize::Words => {
            for (is_word, run) in word_runs(source) {
                if is_word {
                    let token = tree.append_container(code, wrapper_tag)?;
                    tree.set_class(token, "token")?;
                    tree.append_text(token, run)?;
                } else {
                    tree.append_text(code, run)?;
                }
            }
        }
    }
    Ok(tree)
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '.'
}

/// Splits text into maximal runs of word and non-word characters.
fn word_runs(source: &str) -> Vec<(bool, &str)> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (i, ch) in source.char_indices() {
        let word = is_word_char(ch);
        match current {
            Some(kind) if kind == word => {}
            Some(kind) => {
                runs.push((kind, &source[start..i]));
                start = i;
                current = Some(word);
            }
            None => current = Some(word),
        }
    }
    if let Some(kind) = current {
        runs.push((kind, &source[start..]));
    }
    runs
}
