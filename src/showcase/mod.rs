mod console;
mod protocol;
mod server;
mod session;

use std::io;

use tracing::info;

pub use console::run_console;
pub use protocol::{ReactLogEntry, ShowcaseMessage, ShowcaseMessageContent};
pub use server::{serve, Flow, ProtocolError, ShowcaseServer};
pub use session::Showcase;

/// Serves framed messages on stdin/stdout. Logs must go elsewhere.
pub fn run_stdio_mode(showcase: &mut Showcase) -> Result<(), ProtocolError> {
    info!("message loop starting on stdio");
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut server = ShowcaseServer::new(stdin.lock(), stdout.lock());
    serve(showcase, &mut server)
}

pub fn run_interactive_mode(showcase: &mut Showcase) -> io::Result<()> {
    let stdin = io::stdin();
    run_console(showcase, stdin.lock(), io::stdout())
}
