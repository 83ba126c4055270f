//! RocksDB-backed request store.
//!
//! RocksDB itself is thread-safe, but conditional updates are read-check-write
//! sequences; a single coarse `update_lock` serializes them (and guarded
//! inserts) so racing callers observe each other. Plain reads take no lock.
//!
//! Column families: `metadata` (schema version), `request` (hash -> bincode
//! record), `tx_index` (tx hash -> request hash).

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use bincode::Options;
use log::{debug, info};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, IteratorMode, Options as RocksOptions, WriteBatch, DB};

use crate::domain::{MintRequest, RequestStatus};
use crate::foundation::{MintError, RequestHash, Result, TxHash, HASH_SIZE};
use crate::infrastructure::storage::rocks::schema::{KeyBuilder, CF_DEFAULT, CF_METADATA, CF_REQUEST, CF_TX_INDEX};
use crate::infrastructure::storage::rocks::util::acquire_with_timeout;
use crate::infrastructure::storage::{RequestStore, StatusUpdate};
use crate::storage_err;

const SCHEMA_VERSION: u32 = 1;
const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

pub struct RocksRequestStore {
    db: Arc<DB>,
    update_lock: Mutex<()>,
}

impl RocksRequestStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("opening RocksRequestStore path={}", path.display());
        let db = open_db_with_cfs(path)?;
        let store = Self { db: Arc::new(db), update_lock: Mutex::new(()) };
        store.init_schema()?;
        info!("RocksRequestStore opened path={}", path.display());
        Ok(store)
    }

    /// Opens (creating if needed) the `mint-requests` database under `data_dir`.
    pub fn open_in_dir(data_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = data_dir.as_ref();
        fs::create_dir_all(dir).map_err(|err| storage_err!("fs::create_dir_all open_in_dir", err))?;
        Self::open(dir.join("mint-requests"))
    }

    fn init_schema(&self) -> Result<()> {
        match self.schema_version()? {
            None => {
                info!("initializing fresh db schema schema_version={}", SCHEMA_VERSION);
                self.set_schema_version(SCHEMA_VERSION)
            }
            Some(stored) if stored == SCHEMA_VERSION => Ok(()),
            Some(stored) => Err(MintError::SchemaMismatch { stored, current: SCHEMA_VERSION }),
        }
    }

    fn schema_version(&self) -> Result<Option<u32>> {
        let cf = self.cf_handle(CF_METADATA)?;
        match self.db.get_cf(cf, SCHEMA_VERSION_KEY) {
            Ok(Some(bytes)) => {
                let array: [u8; 4] = bytes.as_slice().try_into().map_err(|_| MintError::StorageError {
                    operation: "schema_version decode".to_string(),
                    details: "corrupt schema version".to_string(),
                })?;
                Ok(Some(u32::from_be_bytes(array)))
            }
            Ok(None) => Ok(None),
            Err(err) => Err(storage_err!("rocksdb get_cf schema_version", err)),
        }
    }

    fn set_schema_version(&self, version: u32) -> Result<()> {
        let cf = self.cf_handle(CF_METADATA)?;
        self.db.put_cf(cf, SCHEMA_VERSION_KEY, version.to_be_bytes()).map_err(MintError::from)
    }

    fn cf_handle(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| MintError::StorageError {
            operation: "rocksdb cf_handle".to_string(),
            details: format!("missing column family: {name}"),
        })
    }

    fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        bincode::DefaultOptions::new().with_fixint_encoding().serialize(value).map_err(|err| err.into())
    }

    fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        bincode::DefaultOptions::new().with_fixint_encoding().deserialize(bytes).map_err(|err| err.into())
    }

    fn key_request(hash: &RequestHash) -> Vec<u8> {
        KeyBuilder::with_capacity(4 + HASH_SIZE).prefix(b"req:").hash32(hash.as_hash()).build()
    }

    fn key_tx_index(tx_hash: &TxHash) -> Vec<u8> {
        KeyBuilder::with_capacity(3 + HASH_SIZE).prefix(b"tx:").hash32(tx_hash.as_hash()).build()
    }
}

impl RequestStore for RocksRequestStore {
    fn insert_request_if_absent(&self, request: MintRequest) -> Result<bool> {
        let _guard = acquire_with_timeout(&self.update_lock, "rocks update lock")?;
        let cf = self.cf_handle(CF_REQUEST)?;
        let key = Self::key_request(&request.hash);
        if self.db.get_cf(cf, &key).map_err(|err| storage_err!("rocksdb get_cf request", err))?.is_some() {
            return Ok(false);
        }
        let mut batch = WriteBatch::default();
        batch.put_cf(cf, &key, Self::encode(&request)?);
        if let Some(tx_hash) = request.tx_hash {
            let cf_tx = self.cf_handle(CF_TX_INDEX)?;
            batch.put_cf(cf_tx, Self::key_tx_index(&tx_hash), request.hash.as_hash());
        }
        self.db.write(batch).map_err(|err| storage_err!("rocksdb write insert_request", err))?;
        Ok(true)
    }

    fn get_request(&self, hash: &RequestHash) -> Result<Option<MintRequest>> {
        let cf = self.cf_handle(CF_REQUEST)?;
        let Some(bytes) =
            self.db.get_cf(cf, Self::key_request(hash)).map_err(|err| storage_err!("rocksdb get_cf request", err))?
        else {
            return Ok(None);
        };
        Ok(Some(Self::decode(&bytes)?))
    }

    fn get_request_by_tx_hash(&self, tx_hash: &TxHash) -> Result<Option<MintRequest>> {
        let cf_tx = self.cf_handle(CF_TX_INDEX)?;
        let Some(bytes) = self
            .db
            .get_cf(cf_tx, Self::key_tx_index(tx_hash))
            .map_err(|err| storage_err!("rocksdb get_cf tx_index", err))?
        else {
            return Ok(None);
        };
        if bytes.len() != HASH_SIZE {
            return Err(MintError::StorageError {
                operation: "get_request_by_tx_hash".to_string(),
                details: "corrupt tx index record".to_string(),
            });
        }
        let mut hash = [0u8; HASH_SIZE];
        hash.copy_from_slice(&bytes);
        self.get_request(&RequestHash::from(hash))
    }

    fn list_requests_in_status(&self, status: RequestStatus) -> Result<Vec<MintRequest>> {
        let cf = self.cf_handle(CF_REQUEST)?;
        let mut out = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item.map_err(|err| storage_err!("rocksdb iterator request", err))?;
            let request: MintRequest = Self::decode(&value)?;
            if request.status == status {
                out.push(request);
            }
        }
        out.sort_by_key(|request| (request.created_at_secs, request.hash));
        Ok(out)
    }

    fn update_request_if_status(
        &self,
        hash: &RequestHash,
        expected: &[RequestStatus],
        change: &dyn Fn(&mut MintRequest) -> Result<()>,
    ) -> Result<StatusUpdate> {
        let _guard = acquire_with_timeout(&self.update_lock, "rocks update lock")?;
        let cf = self.cf_handle(CF_REQUEST)?;
        let key = Self::key_request(hash);
        let Some(bytes) = self.db.get_cf(cf, &key).map_err(|err| storage_err!("rocksdb get_cf request", err))? else {
            return Ok(StatusUpdate::Missing);
        };
        let existing: MintRequest = Self::decode(&bytes)?;
        if !expected.contains(&existing.status) {
            return Ok(StatusUpdate::Conflict { actual: existing.status });
        }

        let mut updated = existing.clone();
        change(&mut updated)?;
        // Primary key is immutable under change.
        updated.hash = existing.hash;

        let mut batch = WriteBatch::default();
        batch.put_cf(cf, &key, Self::encode(&updated)?);
        if existing.tx_hash != updated.tx_hash {
            let cf_tx = self.cf_handle(CF_TX_INDEX)?;
            if let Some(old_tx) = existing.tx_hash {
                batch.delete_cf(cf_tx, Self::key_tx_index(&old_tx));
            }
            if let Some(new_tx) = updated.tx_hash {
                batch.put_cf(cf_tx, Self::key_tx_index(&new_tx), updated.hash.as_hash());
            }
        }
        self.db.write(batch).map_err(|err| storage_err!("rocksdb write update_request", err))?;
        Ok(StatusUpdate::Applied(updated))
    }

    fn request_count(&self) -> Result<u64> {
        let cf = self.cf_handle(CF_REQUEST)?;
        let mut count = 0u64;
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            item.map_err(|err| storage_err!("rocksdb iterator request", err))?;
            count += 1;
        }
        Ok(count)
    }

    fn health_check(&self) -> Result<()> {
        self.schema_version().map(|_| ())
    }
}

fn open_db_with_cfs(path: impl AsRef<Path>) -> Result<DB> {
    let mut options = RocksOptions::default();
    options.create_if_missing(true);
    options.create_missing_column_families(true);
    options.set_use_fsync(true);
    options.set_paranoid_checks(true);
    options.optimize_for_point_lookup(64);

    let cfs = vec![
        ColumnFamilyDescriptor::new(CF_DEFAULT, RocksOptions::default()),
        ColumnFamilyDescriptor::new(CF_METADATA, RocksOptions::default()),
        ColumnFamilyDescriptor::new(CF_REQUEST, RocksOptions::default()),
        ColumnFamilyDescriptor::new(CF_TX_INDEX, RocksOptions::default()),
    ];

    DB::open_cf_descriptors(&options, path, cfs)
        .map_err(|err| MintError::StorageError { operation: "rocksdb open_cf_descriptors".to_string(), details: err.to_string() })
}
