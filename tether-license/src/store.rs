//! License persistence and first-run acquisition.

use crate::error::{LicenseError, LicenseResult};
use crate::record::{ANONYMOUS_EMAIL, LicenseRecord};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tether_crypto::{SignatureService, render_uuid};
use tether_wire::{Endpoint, RemoteCall, SignedMessage, fields};
use tracing::{debug, info};
use uuid::Uuid;

/// File name of the license, relative to the installation directory.
pub const LICENSE_FILE_NAME: &str = "tether.lic";

/// Loads the license from disk, bootstrapping an anonymous one if absent.
pub struct LicenseStore {
    path: PathBuf,
    signer: Arc<SignatureService>,
    transport: Arc<dyn RemoteCall>,
}

impl LicenseStore {
    /// Creates a store for the license file at `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        signer: Arc<SignatureService>,
        transport: Arc<dyn RemoteCall>,
    ) -> Self {
        Self {
            path: path.into(),
            signer,
            transport,
        }
    }

    /// Default license location: next to the running executable.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the executable path cannot be determined.
    pub fn default_path() -> LicenseResult<PathBuf> {
        let exe = std::env::current_exe()
            .map_err(|e| LicenseError::Storage(format!("cannot locate executable: {e}")))?;
        let dir = exe
            .parent()
            .ok_or_else(|| LicenseError::Storage("executable has no parent directory".into()))?;
        Ok(dir.join(LICENSE_FILE_NAME))
    }

    /// Returns the license file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and verifies the license.
    ///
    /// If the file does not exist, an anonymous license is acquired and
    /// written first; the record returned is always the one read back from
    /// disk.
    ///
    /// # Errors
    ///
    /// Returns an error if acquisition fails, the file cannot be read or
    /// written, or the stored license does not verify.
    pub async fn load(&self) -> LicenseResult<LicenseRecord> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| self.storage_error("stat", e))?;
        if !exists {
            info!("No license at {:?}, requesting an anonymous license", self.path);
            let record = self.acquire_anonymous().await?;
            self.persist(&record).await?;
        }

        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| self.storage_error("read", e))?;
        let message = SignedMessage::from_slice(&bytes)?;
        let record = LicenseRecord::from_message(&message, &self.signer)?;
        debug!(
            "Loaded license {} for {}",
            record.license_key(),
            record.email()
        );
        Ok(record)
    }

    /// Requests an anonymous license from the authority.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::AcquisitionFailed`] if the authority gives no
    /// verified response, or a record error if the response is not a valid
    /// license.
    pub async fn acquire_anonymous(&self) -> LicenseResult<LicenseRecord> {
        let request = SignedMessage::new()
            .with(fields::EMAIL, ANONYMOUS_EMAIL)
            .with(fields::LICENSE_KEY, render_uuid(&Uuid::nil()));

        let response = self
            .transport
            .call(Endpoint::AnonymousLicense, request)
            .await
            .ok_or(LicenseError::AcquisitionFailed)?;
        LicenseRecord::from_message(&response, &self.signer)
    }

    async fn persist(&self, record: &LicenseRecord) -> LicenseResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| self.storage_error("create directory for", e))?;
        }
        let body = serde_json::to_vec_pretty(&record.to_message().to_json())?;
        // The license file is only ever replaced whole.
        let staging = self.path.with_extension("lic.partial");
        tokio::fs::write(&staging, body)
            .await
            .map_err(|e| self.storage_error("write", e))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| self.storage_error("replace", e))?;
        info!("Stored license {} at {:?}", record.license_key(), self.path);
        Ok(())
    }

    fn storage_error(&self, action: &str, err: std::io::Error) -> LicenseError {
        LicenseError::Storage(format!("failed to {action} {}: {err}", self.path.display()))
    }
}
