// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{config::Settings, storage::StorageDir};

/// Shared, read-only context handed to every mounted route.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub storage: Arc<StorageDir>,
}

impl AppState {
    pub fn new(settings: Settings, storage: StorageDir) -> Self {
        Self {
            settings: Arc::new(settings),
            storage: Arc::new(storage),
        }
    }
}
