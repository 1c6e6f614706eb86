use std::time::Duration;
use tokio::sync::mpsc;

pub const TYPING_QUIET_PERIOD: Duration = Duration::from_millis(300);

pub const VOICE_QUIET_PERIOD: Duration = Duration::from_millis(1_000);

#[derive(Debug)]
pub struct DebounceInput<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for DebounceInput<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> DebounceInput<T> {
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

#[derive(Debug)]
pub struct DebounceOutput<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> DebounceOutput<T> {
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await
    }
}

pub struct DebounceGate;

impl DebounceGate {
    /// Spawns the gate on the current tokio runtime.
    ///
    /// Dropping every [`DebounceInput`] cancels a pending value without
    /// committing it and then closes the output.
    pub fn spawn<T>(quiet: Duration) -> (DebounceInput<T>, DebounceOutput<T>)
    where
        T: Send + 'static,
    {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_gate(input_rx, output_tx, quiet));
        (
            DebounceInput { tx: input_tx },
            DebounceOutput { rx: output_rx },
        )
    }
}

async fn run_gate<T>(
    mut input: mpsc::UnboundedReceiver<T>,
    output: mpsc::UnboundedSender<T>,
    quiet: Duration,
) {
    while let Some(mut pending) = input.recv().await {
        loop {
            tokio::select! {
                next = input.recv() => match next {
                    Some(value) => pending = value,
                    None => return,
                },
                () = tokio::time::sleep(quiet) => {
                    if output.send(pending).is_err() {
                        return;
                    }
                    break;
                }
            }
        }
    }
}
