//! Binary grid snapshots via `rkyv`.

use crate::error::{IoError, Result};
use evolattice_data::GridSnapshot;
use rkyv::de::deserializers::SharedDeserializeMap;
use rkyv::ser::serializers::AllocSerializer;
use rkyv::ser::Serializer;
use rkyv::{AlignedVec, Archive, Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn save_rkyv<T, P>(data: &T, path: P) -> Result<()>
where
    T: Serialize<AllocSerializer<4096>>,
    T: Archive,
    P: AsRef<Path>,
{
    let mut serializer = AllocSerializer::<4096>::default();
    serializer
        .serialize_value(data)
        .map_err(|e| IoError::rkyv(format!("serialization failed: {:?}", e)))?;
    let bytes = serializer.into_serializer().into_inner();
    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    Ok(())
}

pub fn load_rkyv<T, P>(path: P) -> Result<T>
where
    T: Archive,
    T::Archived: Deserialize<T, SharedDeserializeMap>
        + for<'a> rkyv::CheckBytes<rkyv::validation::validators::DefaultValidator<'a>>,
    P: AsRef<Path>,
{
    let raw = std::fs::read(path)?;
    // Archived roots must be read from suitably aligned memory.
    let mut bytes = AlignedVec::with_capacity(raw.len());
    bytes.extend_from_slice(&raw);
    let archived = rkyv::check_archived_root::<T>(&bytes)
        .map_err(|e| IoError::rkyv(format!("validation failed: {:?}", e)))?;
    let mut deserializer = SharedDeserializeMap::default();
    archived
        .deserialize(&mut deserializer)
        .map_err(|e| IoError::rkyv(format!("deserialization failed: {:?}", e)))
}

/// Saves a grid snapshot for a later [`load_snapshot`].
pub fn save_snapshot<P: AsRef<Path>>(grid: &GridSnapshot, path: P) -> Result<()> {
    save_rkyv(grid, &path)
        .map_err(|e| e.with_context(format!("saving snapshot to {:?}", path.as_ref())))
}

/// Loads a grid snapshot. The cells are checked against the snapshot's own
/// header; fitting it to a configuration is left to the simulation.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<GridSnapshot> {
    let context = || format!("loading snapshot from {:?}", path.as_ref());
    let grid: GridSnapshot = load_rkyv(&path).map_err(|e| e.with_context(context()))?;
    let size = grid.size as usize;
    let expected = match grid.dimensions {
        evolattice_data::Dimensions::One => size,
        evolattice_data::Dimensions::Two => size * size,
    };
    if grid.cells.len() != expected {
        return Err(IoError::validation(format!(
            "snapshot holds {} cells, header implies {}",
            grid.cells.len(),
            expected
        ))
        .with_context(context()));
    }
    if let Some(bad) = grid.cells.iter().find(|&&c| c >= grid.strategy_count) {
        return Err(IoError::validation(format!(
            "strategy label {} out of range 0..{}",
            bad, grid.strategy_count
        ))
        .with_context(context()));
    }
    Ok(grid)
}
