pub mod drag;
pub mod new;
pub mod view;

use calboard::ClientResult;
use calboard::state::settle;
use tokio::task::JoinHandle;

use crate::utils::tui::create_spinner;

/// Wait for a dispatched action behind a spinner.
pub async fn wait<T>(message: &str, handle: JoinHandle<ClientResult<T>>) -> ClientResult<T> {
    let spinner = create_spinner(message.to_string());
    let result = settle(handle).await;
    spinner.finish_and_clear();
    result
}
