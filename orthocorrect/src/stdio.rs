use ortho_protocol::Client;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// A client on the other end of stdout, one message per line.
pub struct StdioClient {
    stdout: Mutex<io::Stdout>,
    closed: AtomicBool,
}

impl StdioClient {
    pub fn new() -> Self {
        Self {
            stdout: Mutex::new(io::stdout()),
            closed: AtomicBool::new(false),
        }
    }
}

impl Client for StdioClient {
    fn send(&self, message: &str) -> io::Result<()> {
        let stdout = self.stdout.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stdout = stdout.lock();
        writeln!(stdout, "{}", message)?;
        stdout.flush()
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
