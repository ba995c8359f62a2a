//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues a command without blocking the frame. Returns the reason when the
/// worker cannot take it.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), String> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => Err("UI command queue is full; please retry".to_string()),
        Err(TrySendError::Disconnected(_)) => Err(
            "Backend command processor disconnected (possible startup/runtime failure)"
                .to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use production_core::CatalogStore;

    fn load_command() -> BackendCommand {
        BackendCommand::LoadProducts {
            ticket: CatalogStore::new().begin_refresh(),
        }
    }

    #[test]
    fn full_queue_reports_retry() {
        let (tx, _rx) = bounded(1);
        dispatch_backend_command(&tx, load_command()).expect("first command fits");
        let err = dispatch_backend_command(&tx, load_command()).unwrap_err();
        assert!(err.contains("full"));
    }

    #[test]
    fn disconnected_worker_is_reported() {
        let (tx, rx) = bounded(4);
        drop(rx);
        let err = dispatch_backend_command(&tx, load_command()).unwrap_err();
        assert!(err.contains("disconnected"));
    }
}
