// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{AccessRules, IdentityLookup, StoreIdentityLookup, TokenCodec};
use crate::mail::{LogMailer, Mailer};
use crate::store::Store;

/// Shared application state. Cloned per request; every field is cheap to
/// clone and nothing in here is request-scoped.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
    pub tokens: Arc<TokenCodec>,
    pub identities: Arc<dyn IdentityLookup>,
    pub access: Arc<AccessRules>,
    pub mailer: Arc<dyn Mailer>,
    /// When false, responses carry `X-Frame-Options: DENY`.
    pub allow_frame_embedding: bool,
}

impl AppState {
    /// State with identities resolved from the store's customers, the
    /// storefront allow-list and a logging mailer.
    pub fn new(store: Store, tokens: TokenCodec) -> Self {
        let store = Arc::new(RwLock::new(store));
        Self {
            identities: Arc::new(StoreIdentityLookup::new(store.clone())),
            store,
            tokens: Arc::new(tokens),
            access: Arc::new(AccessRules::storefront()),
            mailer: Arc::new(LogMailer),
            allow_frame_embedding: false,
        }
    }

    pub fn with_identities(mut self, identities: Arc<dyn IdentityLookup>) -> Self {
        self.identities = identities;
        self
    }

    pub fn with_access_rules(mut self, access: AccessRules) -> Self {
        self.access = Arc::new(access);
        self
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }

    pub fn with_frame_embedding(mut self, allow: bool) -> Self {
        self.allow_frame_embedding = allow;
        self
    }
}
