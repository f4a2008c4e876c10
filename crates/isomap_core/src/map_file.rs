//! Binary map file format.
//!
//! A map file is a headerless sequence of 6-byte records, one per cell,
//! row-major (y outer, x inner). Each record holds three little-endian `i16`
//! values: background, left foreground and right foreground. Background ids
//! are stored shifted by one (`0` empty, otherwise `id + 1`); foreground ids
//! are stored unchanged. Since the file carries no size, loading infers the
//! most square `width x height` factorisation of the record count.
//!
//! Every `i16` value decodes to some id and encodes back to the same value.
//! Stored background `1` has no 0-based id above it (that would be the empty
//! id), so it decodes to `-1`, the one background id no other stored value
//! produces.

use crate::grid::{validate_dimensions, DimensionError, MAX_DIMENSION};
use crate::{Layer, MapGrid, TileId};
use std::path::Path;
use thiserror::Error;

/// Bytes per cell record
pub const RECORD_SIZE: usize = 6;

/// In-memory background id of a stored `1`
pub const UNSHIFTED_BACKGROUND_ID: TileId = -1;

/// Background ids that survive the on-disk `+1` shift
pub const MIN_BACKGROUND_ID: TileId = i16::MIN as TileId - 1;
pub const MAX_BACKGROUND_ID: TileId = i16::MAX as TileId - 1;

/// Foreground ids that fit a stored `i16`
pub const MIN_FOREGROUND_ID: TileId = i16::MIN as TileId;
pub const MAX_FOREGROUND_ID: TileId = i16::MAX as TileId;

#[derive(Debug, Error)]
pub enum MapFileError {
    #[error("map data is {len} bytes, not a whole number of 6-byte records")]
    Truncated { len: usize },

    #[error("map file contains no records")]
    Empty,

    #[error("no width/height pair of at most 255 covers {records} records")]
    NoDimensions { records: usize },

    #[error("map is {width}x{height} but the data holds {records} records")]
    DimensionMismatch {
        width: u32,
        height: u32,
        records: usize,
    },

    #[error(transparent)]
    Dimensions(#[from] DimensionError),

    #[error("tile id {id} on {layer:?} at ({x}, {y}) is too large to store")]
    TileIdOutOfRange { layer: Layer, x: u32, y: u32, id: TileId },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pick the most square `(width, height)` with `width * height == records`
/// and both sides at most 255. Width is the larger side when they differ.
pub fn infer_dimensions(records: usize) -> Result<(u32, u32), MapFileError> {
    if records == 0 {
        return Err(MapFileError::Empty);
    }
    let max = MAX_DIMENSION as usize;
    if records > max * max {
        return Err(MapFileError::NoDimensions { records });
    }

    let mut root = 1;
    while (root + 1) * (root + 1) <= records {
        root += 1;
    }

    // Walking down from the square root, the first divisor is the closest pair
    (1..=root)
        .rev()
        .filter(|height| records % height == 0)
        .map(|height| (records / height, height))
        .find(|(width, _)| *width <= max)
        .map(|(width, height)| (width as u32, height as u32))
        .ok_or(MapFileError::NoDimensions { records })
}

fn record_count(bytes: &[u8]) -> Result<usize, MapFileError> {
    if bytes.len() % RECORD_SIZE != 0 {
        return Err(MapFileError::Truncated { len: bytes.len() });
    }
    Ok(bytes.len() / RECORD_SIZE)
}

fn decode_background(value: i16) -> TileId {
    match value {
        0 => Layer::Background.empty_tile(),
        1 => UNSHIFTED_BACKGROUND_ID,
        v => v as TileId - 1,
    }
}

fn encode_background(id: TileId) -> Option<i16> {
    match id {
        id if Layer::Background.is_empty_tile(id) => Some(0),
        UNSHIFTED_BACKGROUND_ID => Some(1),
        id => id.checked_add(1).and_then(|stored| i16::try_from(stored).ok()),
    }
}

/// Decode a map, inferring its dimensions from the record count
pub fn decode(bytes: &[u8]) -> Result<MapGrid, MapFileError> {
    let (width, height) = infer_dimensions(record_count(bytes)?)?;
    decode_with_dimensions(bytes, width, height)
}

/// Decode a map whose dimensions are known
pub fn decode_with_dimensions(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> Result<MapGrid, MapFileError> {
    validate_dimensions(width, height)?;
    let records = record_count(bytes)?;
    if records != (width * height) as usize {
        return Err(MapFileError::DimensionMismatch {
            width,
            height,
            records,
        });
    }

    let mut background = Vec::with_capacity(records);
    let mut left = Vec::with_capacity(records);
    let mut right = Vec::with_capacity(records);

    for chunk in bytes.chunks_exact(RECORD_SIZE) {
        let bg = i16::from_le_bytes([chunk[0], chunk[1]]);
        let lf = i16::from_le_bytes([chunk[2], chunk[3]]);
        let rf = i16::from_le_bytes([chunk[4], chunk[5]]);
        background.push(decode_background(bg));
        left.push(lf as TileId);
        right.push(rf as TileId);
    }

    Ok(MapGrid::from_layers(width, height, background, left, right)?)
}

/// Encode a map into its on-disk bytes
pub fn encode(map: &MapGrid) -> Result<Vec<u8>, MapFileError> {
    let mut bytes = Vec::with_capacity((map.width() * map.height()) as usize * RECORD_SIZE);
    for y in 0..map.height() {
        for x in 0..map.width() {
            let bg = map.get(Layer::Background, x, y);
            let stored_bg = encode_background(bg).ok_or(MapFileError::TileIdOutOfRange {
                layer: Layer::Background,
                x,
                y,
                id: bg,
            })?;
            bytes.extend_from_slice(&stored_bg.to_le_bytes());

            for layer in [Layer::LeftForeground, Layer::RightForeground] {
                let id = map.get(layer, x, y);
                let stored = i16::try_from(id)
                    .map_err(|_| MapFileError::TileIdOutOfRange { layer, x, y, id })?;
                bytes.extend_from_slice(&stored.to_le_bytes());
            }
        }
    }
    Ok(bytes)
}

/// Read and decode a map file
pub fn load(path: &Path) -> Result<MapGrid, MapFileError> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

/// Encode the whole map before touching the file, then truncate and write
/// it in one call so a failed encode never leaves a partial file behind.
pub fn save(map: &MapGrid, path: &Path) -> Result<(), MapFileError> {
    let bytes = encode(map)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(bg: i16, left: i16, right: i16) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&bg.to_le_bytes());
        bytes.extend_from_slice(&left.to_le_bytes());
        bytes.extend_from_slice(&right.to_le_bytes());
        bytes
    }

    #[test]
    fn test_infer_most_square_dimensions() {
        assert_eq!(infer_dimensions(16).unwrap(), (4, 4));
        assert_eq!(infer_dimensions(12).unwrap(), (4, 3));
        assert_eq!(infer_dimensions(7).unwrap(), (7, 1));
        assert_eq!(infer_dimensions(255 * 255).unwrap(), (255, 255));
        assert_eq!(infer_dimensions(510).unwrap(), (30, 17));
        assert_eq!(infer_dimensions(251 * 2).unwrap(), (251, 2));
    }

    #[test]
    fn test_infer_rejects_impossible_counts() {
        // Prime larger than 255 has no pair under the cap
        assert!(matches!(
            infer_dimensions(257),
            Err(MapFileError::NoDimensions { records: 257 })
        ));
        assert!(matches!(infer_dimensions(0), Err(MapFileError::Empty)));
        assert!(matches!(
            infer_dimensions(2 * 257),
            Err(MapFileError::NoDimensions { .. })
        ));
        assert!(matches!(
            infer_dimensions(256 * 256),
            Err(MapFileError::NoDimensions { .. })
        ));
    }

    #[test]
    fn test_background_shift() {
        let mut bytes = Vec::new();
        bytes.extend(record(0, 0, 0));
        bytes.extend(record(8, 3, 0));
        bytes.extend(record(2, 0, 9));
        bytes.extend(record(0, 0, 0));
        let map = decode(&bytes).unwrap();
        assert_eq!((map.width(), map.height()), (2, 2));
        assert_eq!(map.get(Layer::Background, 0, 0), 0);
        assert_eq!(map.get(Layer::Background, 1, 0), 7);
        assert_eq!(map.get(Layer::Background, 0, 1), 1);
        assert_eq!(map.get(Layer::LeftForeground, 1, 0), 3);
        assert_eq!(map.get(Layer::RightForeground, 0, 1), 9);
    }

    #[test]
    fn test_round_trip_bytes() {
        let mut bytes = Vec::new();
        for i in 0..12i16 {
            let bg = if i % 3 == 0 { 0 } else { i + 2 };
            bytes.extend(record(bg, i, 11 - i));
        }
        let map = decode(&bytes).unwrap();
        assert_eq!(encode(&map).unwrap(), bytes);
    }

    #[test]
    fn test_round_trip_map() {
        let mut map = MapGrid::new(5, 3).unwrap();
        map.set(Layer::Background, 0, 0, 0);
        map.set(Layer::Background, 1, 0, 1);
        map.set(Layer::Background, 4, 2, MAX_BACKGROUND_ID);
        map.set(Layer::Background, 3, 2, -40);
        map.set(Layer::RightForeground, 2, 1, MAX_FOREGROUND_ID);
        map.set(Layer::LeftForeground, 2, 1, -2);
        let decoded = decode_with_dimensions(&encode(&map).unwrap(), 5, 3).unwrap();
        assert_eq!(decoded, map);
    }

    #[test]
    fn test_negative_values_round_trip() {
        let mut bytes = Vec::new();
        bytes.extend(record(5, -3, 0));
        bytes.extend(record(-7, 0, i16::MIN));
        bytes.extend(record(i16::MIN, -1, 4));
        bytes.extend(record(0, 0, -12));
        let map = decode(&bytes).unwrap();
        assert_eq!((map.width(), map.height()), (2, 2));
        assert_eq!(map.get(Layer::Background, 0, 0), 4);
        assert_eq!(map.get(Layer::LeftForeground, 0, 0), -3);
        assert_eq!(map.get(Layer::Background, 1, 0), -8);
        assert_eq!(map.get(Layer::Background, 0, 1), MIN_BACKGROUND_ID);
        assert_eq!(map.get(Layer::RightForeground, 1, 0), MIN_FOREGROUND_ID);
        assert_eq!(encode(&map).unwrap(), bytes);
    }

    #[test]
    fn test_stored_background_one_round_trips() {
        let mut bytes = record(1, 0, 0);
        bytes.extend(record(0, 0, 0));
        bytes.extend(record(1, 2, 0));
        bytes.extend(record(2, 0, 0));
        let map = decode(&bytes).unwrap();
        assert_eq!(map.get(Layer::Background, 0, 0), UNSHIFTED_BACKGROUND_ID);
        assert_eq!(map.get(Layer::Background, 1, 1), 1);
        assert!(!Layer::Background.is_empty_tile(map.get(Layer::Background, 0, 0)));
        assert_eq!(encode(&map).unwrap(), bytes);
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(matches!(
            decode(&[0u8; 7]),
            Err(MapFileError::Truncated { len: 7 })
        ));
        assert!(matches!(
            decode_with_dimensions(&record(0, 0, 0), 2, 2),
            Err(MapFileError::DimensionMismatch { records: 1, .. })
        ));
        assert!(matches!(
            decode_with_dimensions(&record(0, 0, 0), 0, 1),
            Err(MapFileError::Dimensions(_))
        ));
        let bytes = vec![0u8; 257 * RECORD_SIZE];
        assert!(matches!(
            decode(&bytes),
            Err(MapFileError::NoDimensions { .. })
        ));
    }

    #[test]
    fn test_encode_rejects_unstorable_ids() {
        for (layer, id) in [
            (Layer::Background, MAX_BACKGROUND_ID + 1),
            (Layer::Background, MIN_BACKGROUND_ID - 1),
            (Layer::LeftForeground, MIN_FOREGROUND_ID - 1),
        ] {
            let mut map = MapGrid::new(1, 1).unwrap();
            map.set(layer, 0, 0, id);
            assert!(matches!(
                encode(&map),
                Err(MapFileError::TileIdOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.map");

        let mut map = MapGrid::new(6, 4).unwrap();
        map.set(Layer::Background, 5, 3, 42);
        map.set(Layer::LeftForeground, 0, 0, 2);
        save(&map, &path).unwrap();

        assert_eq!(std::fs::metadata(&path).unwrap().len(), 6 * 4 * 6);
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_failed_save_leaves_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.map");
        std::fs::write(&path, record(0, 0, 0)).unwrap();

        let mut map = MapGrid::new(1, 1).unwrap();
        map.set(Layer::RightForeground, 0, 0, MAX_FOREGROUND_ID + 1);
        assert!(save(&map, &path).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), record(0, 0, 0));
    }
}
