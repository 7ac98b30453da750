use crate::auth::CredentialService;
use crate::database::{AnalystRepository, DatabaseManager, ProposalRepository};

/// Shared handler state: the storage handle and the credential service.
/// Both are cheap to clone.
#[derive(Clone, Debug)]
pub struct AppState {
    pub database: DatabaseManager,
    pub credentials: CredentialService,
}

impl AppState {
    pub fn new(database: DatabaseManager, credentials: CredentialService) -> Self {
        Self {
            database,
            credentials,
        }
    }

    pub fn proposals(&self) -> ProposalRepository {
        ProposalRepository::new(self.database.pool().clone())
    }

    pub fn analysts(&self) -> AnalystRepository {
        AnalystRepository::new(self.database.pool().clone(), self.credentials.clone())
    }
}
