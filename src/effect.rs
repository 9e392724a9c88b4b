//! Effects - side effects declared by the reducer

/// Requests carry the generation they were issued under so late results can
/// be recognised and dropped.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch a listing page and resolve every entry
    LoadCatalogPage { page: u32, generation: u64 },
    /// Look up one Pokemon by its normalized name
    SearchPokemon { name: String, generation: u64 },
}
