//! Interrupt handling and terminal cleanup
//!
//! A [`Cancellation`] token is shared between the signal handler and the
//! prompts. Prompts hold a [`PromptGuard`] while they wait for input, so an
//! interrupt can tell "cancelled a prompt" (exit 1) from "stopped while
//! working" (exit 0). Guards restore the cursor when dropped.

use crate::error::ScaffoldError;
use anyhow::Result;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Exit code for an interrupt outside any prompt
pub const EXIT_INTERRUPTED: i32 = 0;

/// Exit code for an interrupt inside a prompt
pub const EXIT_PROMPT_CANCELLED: i32 = 1;

/// Re-enable the cursor prompts may have hidden
pub fn restore_cursor() {
    let _ = console::Term::stderr().show_cursor();
    let _ = console::Term::stdout().show_cursor();
}

#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    prompting: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route SIGINT/SIGTERM through this token. Only one handler can be
    /// installed per process.
    pub fn install_handler(&self) -> Result<()> {
        let token = self.clone();
        ctrlc::set_handler(move || {
            restore_cursor();
            println!();
            std::process::exit(token.exit_code());
        })?;
        Ok(())
    }

    pub fn is_prompting(&self) -> bool {
        self.prompting.load(Ordering::SeqCst)
    }

    /// Exit code an interrupt would produce right now
    pub fn exit_code(&self) -> i32 {
        if self.is_prompting() {
            EXIT_PROMPT_CANCELLED
        } else {
            EXIT_INTERRUPTED
        }
    }

    /// Mark a prompt as active until the guard drops
    pub fn prompt(&self) -> PromptGuard {
        self.prompting.store(true, Ordering::SeqCst);
        PromptGuard {
            prompting: Arc::clone(&self.prompting),
        }
    }
}

/// Active prompt marker
#[derive(Debug)]
pub struct PromptGuard {
    prompting: Arc<AtomicBool>,
}

impl Drop for PromptGuard {
    fn drop(&mut self) {
        self.prompting.store(false, Ordering::SeqCst);
        restore_cursor();
    }
}

/// Restores the cursor when the whole run ends, however it ends
#[derive(Debug, Default)]
pub struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_cursor();
    }
}

/// Map prompt I/O results, turning Ctrl+C/Esc into [`ScaffoldError::PromptCancelled`]
pub trait PromptResultExt<T> {
    fn or_cancelled(self) -> Result<T>;
}

impl<T> PromptResultExt<T> for io::Result<T> {
    fn or_cancelled(self) -> Result<T> {
        self.map_err(|e| {
            if e.kind() == io::ErrorKind::Interrupted {
                ScaffoldError::PromptCancelled.into()
            } else {
                anyhow::Error::new(e).context("Prompt failed")
            }
        })
    }
}
