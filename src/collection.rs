//! Caught collection: an ordered, id-unique list of Pokemon persisted in full
//! on every change.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::pagination;
use crate::state::PokemonDetail;

/// Storage key of the caught collection.
pub const COLLECTION_KEY: &str = "caughtPokemons";

#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("stored collection is corrupted: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("failed to encode collection: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Whole-collection persistence. Loads and saves are synchronous.
pub trait CollectionRepository: Send + Sync {
    /// Absent storage loads as an empty collection.
    fn load(&self) -> Result<Vec<PokemonDetail>, RepositoryError>;

    /// Overwrites the stored collection with `pokemon`.
    fn save(&self, pokemon: &[PokemonDetail]) -> Result<(), RepositoryError>;
}

fn decode(raw: &str) -> Result<Vec<PokemonDetail>, RepositoryError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).map_err(RepositoryError::Corrupt)
}

fn encode(pokemon: &[PokemonDetail]) -> Result<String, RepositoryError> {
    serde_json::to_string(pokemon).map_err(RepositoryError::Encode)
}

/// JSON file under the data directory, named after [`COLLECTION_KEY`].
#[derive(Clone, Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{COLLECTION_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> RepositoryError {
        RepositoryError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CollectionRepository for JsonFileRepository {
    fn load(&self) -> Result<Vec<PokemonDetail>, RepositoryError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => decode(&raw),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn save(&self, pokemon: &[PokemonDetail]) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = encode(pokemon)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

/// Keeps the serialized collection in memory. Used when nothing should touch
/// the disk.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    raw: Mutex<Option<String>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw contents, as if another process had written it.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CollectionRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<PokemonDetail>, RepositoryError> {
        match self.raw() {
            Some(raw) => decode(&raw),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, pokemon: &[PokemonDetail]) -> Result<(), RepositoryError> {
        let json = encode(pokemon)?;
        *self.raw.lock().unwrap_or_else(PoisonError::into_inner) = Some(json);
        Ok(())
    }
}

/// Cheaply cloneable handle to the repository backing a [`CaughtStore`].
#[derive(Clone)]
pub struct SharedRepository(Arc<dyn CollectionRepository>);

impl SharedRepository {
    pub fn new(repository: impl CollectionRepository + 'static) -> Self {
        Self(Arc::new(repository))
    }

    pub fn from_arc(repository: Arc<dyn CollectionRepository>) -> Self {
        Self(repository)
    }
}

impl Default for SharedRepository {
    fn default() -> Self {
        Self::new(MemoryRepository::new())
    }
}

impl fmt::Debug for SharedRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedRepository(..)")
    }
}

/// The caught collection as seen by the reducer.
///
/// Mutators build the next full sequence, write it through the repository,
/// and only replace the in-memory copy once the write succeeded.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaughtStore {
    items: Vec<PokemonDetail>,
    #[serde(skip)]
    repository: SharedRepository,
}

impl CaughtStore {
    /// Load the collection. Unreadable or malformed storage starts empty.
    pub fn open(repository: SharedRepository) -> Self {
        let items = match repository.0.load() {
            Ok(items) => dedup_by_id(items),
            Err(error) => {
                tracing::warn!(%error, "caught collection unreadable, starting empty");
                Vec::new()
            }
        };
        tracing::debug!(count = items.len(), "caught collection loaded");
        Self { items, repository }
    }

    pub fn items(&self) -> &[PokemonDetail] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&PokemonDetail> {
        self.items.iter().find(|pokemon| pokemon.id == id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    pub fn page(&self, page: u32, per_page: u32) -> &[PokemonDetail] {
        pagination::page_slice(&self.items, page, per_page)
    }

    /// Append `pokemon`. Returns `false` without writing when its id is
    /// already caught.
    pub fn add(&mut self, pokemon: PokemonDetail) -> Result<bool, RepositoryError> {
        if self.contains(pokemon.id) {
            return Ok(false);
        }
        let mut next = self.items.clone();
        next.push(pokemon);
        self.commit(next)?;
        Ok(true)
    }

    /// Drop the entry with `id`. Absent ids change nothing and write nothing.
    pub fn remove(&mut self, id: u32) -> Result<Option<PokemonDetail>, RepositoryError> {
        let Some(index) = self.items.iter().position(|pokemon| pokemon.id == id) else {
            return Ok(None);
        };
        let mut next = self.items.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(Some(removed))
    }

    fn commit(&mut self, next: Vec<PokemonDetail>) -> Result<(), RepositoryError> {
        self.repository.0.save(&next)?;
        self.items = next;
        Ok(())
    }
}

// Serialized as the bare item list; the repository handle is not state.
impl JsonSchema for CaughtStore {
    fn schema_name() -> String {
        "CaughtStore".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <Vec<PokemonDetail>>::json_schema(gen)
    }
}

impl fmt::Debug for CaughtStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaughtStore")
            .field("items", &self.items.len())
            .field("repository", &self.repository)
            .finish()
    }
}

fn dedup_by_id(items: Vec<PokemonDetail>) -> Vec<PokemonDetail> {
    let mut unique: Vec<PokemonDetail> = Vec::with_capacity(items.len());
    for pokemon in items {
        if !unique.iter().any(|existing| existing.id == pokemon.id) {
            unique.push(pokemon);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{NamedRef, Sprites, TypeSlot};
    use pretty_assertions::assert_eq;

    fn pokemon(id: u32, name: &str) -> PokemonDetail {
        PokemonDetail {
            id,
            name: name.to_string(),
            sprites: Sprites {
                front_default: Some(format!("https://img/{id}.png")),
            },
            types: vec![TypeSlot {
                type_info: NamedRef {
                    name: "normal".into(),
                },
            }],
            abilities: Vec::new(),
            stats: Vec::new(),
        }
    }

    struct FailingRepository;

    impl CollectionRepository for FailingRepository {
        fn load(&self) -> Result<Vec<PokemonDetail>, RepositoryError> {
            Ok(vec![pokemon(1, "bulbasaur")])
        }

        fn save(&self, _pokemon: &[PokemonDetail]) -> Result<(), RepositoryError> {
            Err(RepositoryError::Io {
                path: PathBuf::from("/read-only"),
                source: std::io::Error::from(ErrorKind::PermissionDenied),
            })
        }
    }

    #[test]
    fn test_empty_memory_store_loads_empty() {
        let repo = MemoryRepository::new();
        assert!(repo.load().unwrap().is_empty());

        repo.save(&[]).unwrap();
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_contents_open_empty() {
        let store = CaughtStore::open(SharedRepository::new(MemoryRepository::with_raw(
            "{not json",
        )));
        assert!(store.is_empty());

        let store = CaughtStore::open(SharedRepository::new(MemoryRepository::with_raw(
            r#"{"id": 1}"#,
        )));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_persists_before_publishing() {
        let repo = Arc::new(MemoryRepository::new());
        let mut store = CaughtStore::open(SharedRepository::from_arc(repo.clone()));

        assert!(store.add(pokemon(25, "pikachu")).unwrap());

        let persisted = repo.load().unwrap();
        assert_eq!(persisted, store.items().to_vec());
        assert_eq!(persisted[0].name, "pikachu");
    }

    #[test]
    fn test_add_then_remove_restores_collection() {
        let repo = Arc::new(MemoryRepository::new());
        let mut store = CaughtStore::open(SharedRepository::from_arc(repo.clone()));
        store.add(pokemon(1, "bulbasaur")).unwrap();
        store.add(pokemon(4, "charmander")).unwrap();
        let before = store.items().to_vec();

        store.add(pokemon(7, "squirtle")).unwrap();
        let removed = store.remove(7).unwrap();

        assert_eq!(removed.map(|p| p.name), Some("squirtle".to_string()));
        assert_eq!(store.items().to_vec(), before);
        assert_eq!(repo.load().unwrap(), before);
    }

    #[test]
    fn test_duplicate_add_is_rejected() {
        let mut store = CaughtStore::default();
        assert!(store.add(pokemon(25, "pikachu")).unwrap());
        assert!(!store.add(pokemon(25, "pikachu")).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_absent_id_changes_nothing() {
        let repo = Arc::new(MemoryRepository::new());
        let mut store = CaughtStore::open(SharedRepository::from_arc(repo.clone()));
        store.add(pokemon(25, "pikachu")).unwrap();
        let raw_before = repo.raw();

        assert_eq!(store.remove(999).unwrap(), None);
        assert_eq!(store.len(), 1);
        assert_eq!(repo.raw(), raw_before);
    }

    #[test]
    fn test_failed_save_keeps_previous_collection() {
        let mut store = CaughtStore::open(SharedRepository::new(FailingRepository));
        assert_eq!(store.len(), 1);

        assert!(store.add(pokemon(25, "pikachu")).is_err());
        assert_eq!(store.len(), 1);

        assert!(store.remove(1).is_err());
        assert!(store.contains(1));
    }

    #[test]
    fn test_open_drops_duplicate_ids() {
        let raw = serde_json::to_string(&vec![
            pokemon(25, "pikachu"),
            pokemon(25, "pikachu"),
            pokemon(1, "bulbasaur"),
        ])
        .unwrap();
        let store = CaughtStore::open(SharedRepository::new(MemoryRepository::with_raw(raw)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_pages_of_twenty_three() {
        let mut store = CaughtStore::default();
        for id in 1..=23 {
            store.add(pokemon(id, &format!("mon-{id}"))).unwrap();
        }
        assert_eq!(store.page(1, 10).len(), 10);
        assert_eq!(store.page(3, 10).len(), 3);
        assert_eq!(store.page(3, 10)[0].id, 21);
    }

    #[test]
    fn test_file_repository_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nested"));
        assert!(repo.load().unwrap().is_empty());

        let collection = vec![pokemon(25, "pikachu"), pokemon(133, "eevee")];
        repo.save(&collection).unwrap();

        assert!(repo.path().ends_with("caughtPokemons.json"));
        assert_eq!(repo.load().unwrap(), collection);
    }

    #[test]
    fn test_file_repository_reports_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path());
        std::fs::write(repo.path(), "[{\"id\":").unwrap();

        assert!(matches!(repo.load(), Err(RepositoryError::Corrupt(_))));
        let store = CaughtStore::open(SharedRepository::new(repo));
        assert!(store.is_empty());
    }
}
