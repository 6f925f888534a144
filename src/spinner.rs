//! Progress feedback on stderr while the trainer works.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

const TICK: Duration = Duration::from_millis(80);

/// A one-line spinner that animates for as long as a future is pending.
pub struct Spinner<'a> {
    message: &'a str,
    frame: usize,
}

impl<'a> Spinner<'a> {
    /// Drive `fut` to completion with a spinner labelled `message`, then
    /// clear the line and hand back the output.
    pub async fn run<F: Future>(message: &'a str, fut: F) -> F::Output {
        let mut spinner = Spinner { message, frame: 0 };
        let mut ticks = tokio::time::interval(TICK);
        tokio::pin!(fut);

        let output = loop {
            tokio::select! {
                output = &mut fut => break output,
                _ = ticks.tick() => spinner.draw(),
            }
        };
        clear_line();
        output
    }

    fn draw(&mut self) {
        let frame = FRAMES[self.frame % FRAMES.len()];
        self.frame += 1;
        eprint!("\x1b[2K\r{frame} {}", self.message);
        let _ = std::io::stderr().flush();
    }
}

fn clear_line() {
    eprint!("\x1b[2K\r");
    let _ = std::io::stderr().flush();
}
