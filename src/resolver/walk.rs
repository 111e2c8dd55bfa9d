//! Line and column walks over a [`DisplayTree`].
//!
//! The line walk counts `\n` characters depth-first, left to right. Once the
//! newline that opens the target line is found, the column walk counts
//! characters forward in document order from the character right after it.
//! Inline containers are transparent to both walks: they add no characters
//! and no line breaks of their own.

use tracing::trace;

use super::point::{Miss, TextPoint};
use crate::display::{DisplayTree, NodeId, NodeKind};

enum LineWalk {
    Done(TextPoint),
    Counted(usize),
}

/// Locates `line` (1-based) and `col` (0-based, in characters) below `root`.
pub fn resolve(tree: &DisplayTree, root: NodeId, line: usize, col: usize) -> TextPoint {
    let point = match line {
        0 => TextPoint::NotFound(Miss::lines(0)),
        1 => match tree.first_child(root) {
            Some(first) => find_text_col_point(tree, root, first, col),
            None => TextPoint::NotFound(Miss::columns(0)),
        },
        _ => match find_text_point(tree, root, root, line - 1, col) {
            LineWalk::Done(point) => point,
            LineWalk::Counted(newlines) => TextPoint::NotFound(Miss::lines(newlines + 1)),
        },
    };
    trace!(line, col, ?point, "resolved text point");
    point
}

/// Scans the children of `el` until `wanted` newlines have been seen.
fn find_text_point(
    tree: &DisplayTree,
    scope: NodeId,
    el: NodeId,
    wanted: usize,
    col: usize,
) -> LineWalk {
    let mut newlines = 0;
    for &child in tree.children(el) {
        let Some(node) = tree.get(child) else {
            continue;
        };
        match &node.kind {
            NodeKind::Text(value) => {
                for (index, ch) in value.chars().enumerate() {
                    if ch != '\n' {
                        continue;
                    }
                    newlines += 1;
                    if newlines == wanted {
                        let seed = index + 1;
                        let point = match find_text_col_point(tree, scope, child, seed + col) {
                            TextPoint::NotFound(miss) => {
                                TextPoint::NotFound(Miss::columns(miss.counted.saturating_sub(seed)))
                            }
                            found => found,
                        };
                        return LineWalk::Done(point);
                    }
                }
            }
            NodeKind::Container { .. } => {
                match find_text_point(tree, scope, child, wanted - newlines, col) {
                    LineWalk::Counted(seen) => newlines += seen,
                    done => return done,
                }
            }
        }
    }
    LineWalk::Counted(newlines)
}

/// Counts `col` characters forward from `start`, leaving no ancestor below `scope`.
fn find_text_col_point(tree: &DisplayTree, scope: NodeId, start: NodeId, col: usize) -> TextPoint {
    let mut consumed = 0;
    let mut last = start;
    let mut cursor = Some(start);

    loop {
        while let Some(current) = cursor {
            match count_columns(tree, current, col - consumed) {
                Ok((unit, offset)) => return TextPoint::Found { unit, offset },
                Err(seen) => consumed += seen,
            }
            last = current;
            cursor = tree.next_sibling(current);
        }
        match tree.parent(last) {
            Some(parent) if parent != scope => {
                last = parent;
                cursor = tree.next_sibling(parent);
            }
            _ => return TextPoint::NotFound(Miss::columns(consumed)),
        }
    }
}

/// Looks for the `col`-th character inside `node`, children first.
///
/// On a miss, returns how many characters `node` holds.
fn count_columns(tree: &DisplayTree, node: NodeId, col: usize) -> Result<(NodeId, usize), usize> {
    let Some(entry) = tree.get(node) else {
        return Err(0);
    };
    match &entry.kind {
        NodeKind::Text(value) => {
            let len = value.chars().count();
            if len >= col {
                Ok((node, col))
            } else {
                Err(len)
            }
        }
        NodeKind::Container { .. } => {
            let mut consumed = 0;
            for &child in tree.children(node) {
                match count_columns(tree, child, col - consumed) {
                    Ok(found) => return Ok(found),
                    Err(seen) => consumed += seen,
                }
            }
            Err(consumed)
        }
    }
}
