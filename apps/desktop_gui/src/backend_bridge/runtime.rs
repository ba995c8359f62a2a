//! Worker thread owning the tokio runtime and the HTTP client. Commands come
//! in from the UI; outcomes go back as [`UiEvent`]s.

use std::thread;

use crossbeam_channel::{Receiver, Sender};
use production_core::{
    browser::interpret_delete_reply, production::interpret_push_reply,
    undo::interpret_undo_reply, HttpProductionApi, ProductionApi, Settings,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: Settings) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::BackendUnavailable(format!(
                    "backend worker startup failure: {err}"
                )));
                return;
            }
        };

        let api = match HttpProductionApi::from_settings(&settings) {
            Ok(api) => api,
            Err(err) => {
                tracing::error!("failed to build http client: {err}");
                let _ = ui_tx.try_send(UiEvent::BackendUnavailable(format!(
                    "backend worker startup failure: {err}"
                )));
                return;
            }
        };
        tracing::info!(endpoint = api.endpoint_url(), "backend worker ready");

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                let event = run_command(&api, cmd).await;
                if ui_tx.send(event).is_err() {
                    break;
                }
            }
        });
        tracing::info!("backend worker stopped");
    });
}

async fn run_command<A: ProductionApi>(api: &A, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::LoadProducts { ticket } => UiEvent::ProductsLoaded {
            ticket,
            result: api.get_all_products().await,
        },
        BackendCommand::PushToProduction(request) => {
            let outcome = match api.push_to_production(request.clone()).await {
                Ok(reply) => interpret_push_reply(reply, &request),
                Err(err) => Err(err),
            };
            UiEvent::ProductionFinished(outcome)
        }
        BackendCommand::UndoProduction(request) => {
            let outcome = match api.undo_production(request).await {
                Ok(reply) => interpret_undo_reply(reply),
                Err(err) => Err(err),
            };
            UiEvent::UndoFinished(outcome)
        }
        BackendCommand::DeleteProduct(request) => {
            let product_id = request.product_id.clone();
            let outcome = match api.delete_product(request).await {
                Ok(reply) => interpret_delete_reply(reply),
                Err(err) => Err(err),
            };
            UiEvent::DeleteFinished {
                product_id,
                outcome,
            }
        }
    }
}
