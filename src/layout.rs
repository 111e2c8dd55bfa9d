//! Placement of the code panels relative to the running app.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CodePlacement {
    /// Code tabs below the app.
    #[default]
    Inline,
    /// Code tabs beside the app.
    SideBySide,
}

/// Where the panels move when the placement changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relocation {
    pub show_host: &'static str,
    pub hide_host: &'static str,
    pub ui_code_parent: &'static str,
    pub server_code_parent: &'static str,
}

impl Relocation {
    fn for_placement(placement: CodePlacement) -> Self {
        match placement {
            CodePlacement::SideBySide => Self {
                show_host: "showcase-sxs-code",
                hide_host: "showcase-code-inline",
                ui_code_parent: "ui-r-code-tab",
                server_code_parent: "server-r-code-tab",
            },
            CodePlacement::Inline => Self {
                show_host: "showcase-code-inline",
                hide_host: "showcase-sxs-code",
                ui_code_parent: "ui-r-code-inline",
                server_code_parent: "server-r-code-inline",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSizing {
    pub app_width: f64,
    pub zoom: f64,
}

/// Width and zoom of the app panel when the code sits beside it.
pub fn sxs_sizing(total_width: f64, target: f64) -> AppSizing {
    if total_width / 2.0 > target {
        AppSizing {
            app_width: total_width / 2.0,
            zoom: 1.0,
        }
    } else if total_width * 0.66 > target {
        AppSizing {
            app_width: target,
            zoom: 1.0,
        }
    } else {
        // Too narrow to share: keep two thirds and scale the app down.
        let app_width = total_width * 0.66;
        AppSizing {
            app_width,
            zoom: app_width / target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutState {
    placement: CodePlacement,
    target_width: f64,
}

impl LayoutState {
    pub fn new(target_width: f64) -> Self {
        Self {
            placement: CodePlacement::default(),
            target_width,
        }
    }

    pub fn placement(&self) -> CodePlacement {
        self.placement
    }

    pub fn toggle(&mut self) -> Relocation {
        self.placement = match self.placement {
            CodePlacement::Inline => CodePlacement::SideBySide,
            CodePlacement::SideBySide => CodePlacement::Inline,
        };
        Relocation::for_placement(self.placement)
    }

    /// Only side-by-side placement depends on the window width.
    pub fn on_resize(&self, total_width: f64) -> Option<AppSizing> {
        match self.placement {
            CodePlacement::SideBySide => Some(sxs_sizing(total_width, self.target_width)),
            CodePlacement::Inline => None,
        }
    }
}
