pub mod handlers;

use std::sync::Arc;

use crate::adapter::ExadsAdapter;
use crate::bidding::dispatcher::Dispatcher;

#[derive(Clone)]
pub struct AppState {
    pub adapter: Arc<ExadsAdapter>,
    pub dispatcher: Arc<Dispatcher>,
}
