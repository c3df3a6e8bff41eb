//! Single-line encoding of world snapshots for external storage.
//!
//! The encoded form is `tokenfield:v1:<payload>` where the payload is the
//! JSON snapshot in unpadded base64. Decoding never partially applies a
//! malformed save; callers fall back to a fresh world on any error.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use thiserror::Error;
use tokenfield_world::snapshot::WorldSnapshot;

const SNAPSHOT_DOMAIN: &str = "tokenfield";
const SNAPSHOT_VERSION: &str = "v1";

/// Prefix every encoded save line starts with.
pub(crate) const SNAPSHOT_HEADER: &str = "tokenfield:v1";
/// Separates the domain, version and payload segments.
const FIELD_DELIMITER: char = ':';

/// Encodes a snapshot into a single-line string suitable for storage.
pub(crate) fn encode(snapshot: &WorldSnapshot) -> String {
    let json = serde_json::to_vec(snapshot).expect("snapshot serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    format!("{SNAPSHOT_HEADER}{FIELD_DELIMITER}{encoded}")
}

/// Decodes a snapshot from its string representation.
pub(crate) fn decode(value: &str) -> Result<WorldSnapshot, SnapshotTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SnapshotTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(SnapshotTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(SnapshotTransferError::MissingVersion)?;
    let payload = parts.next().ok_or(SnapshotTransferError::MissingPayload)?;

    if domain != SNAPSHOT_DOMAIN {
        return Err(SnapshotTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotTransferError::UnsupportedVersion(version.to_owned()));
    }

    let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
    let snapshot: WorldSnapshot = serde_json::from_slice(&bytes)?;
    Ok(snapshot)
}

/// Errors that can occur while decoding saved snapshot strings.
#[derive(Debug, Error)]
pub(crate) enum SnapshotTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("save payload was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    #[error("save string is missing the prefix")]
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    #[error("save string is missing the version")]
    MissingVersion,
    /// The encoded snapshot did not include the payload segment.
    #[error("save string is missing the payload")]
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("save prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("save version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode save payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse save payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, SnapshotTransferError, SNAPSHOT_HEADER};
    use tokenfield_core::{Command, GridCoord, WorldPosition};
    use tokenfield_world::{apply, query, snapshot, World};

    fn played_snapshot() -> snapshot::WorldSnapshot {
        let mut world = World::with_seed(11);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MovePlayer {
                position: WorldPosition::new(37.5, -12.0),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::MaterializeCell {
                cell: GridCoord::new(3, -2),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::EvictCell {
                cell: GridCoord::new(3, -2),
            },
            &mut events,
        );
        snapshot::snapshot(&world)
    }

    #[test]
    fn round_trip_fresh_world() {
        let captured = snapshot::snapshot(&World::new());
        let encoded = encode(&captured);
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:")));

        let decoded = decode(&encoded).expect("snapshot decodes");
        assert_eq!(captured, decoded);
    }

    #[test]
    fn round_trip_played_session() {
        let captured = played_snapshot();
        assert!(!captured.ledger.is_empty());

        let decoded = decode(&encode(&captured)).expect("snapshot decodes");
        assert_eq!(captured, decoded);

        let restored = World::from_snapshot(decoded);
        assert_eq!(query::ledger_len(&restored), captured.ledger.len());
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(matches!(
            decode("   "),
            Err(SnapshotTransferError::EmptyPayload)
        ));
    }

    #[test]
    fn foreign_prefix_is_rejected() {
        assert!(matches!(
            decode("gridgame:v1:abcd"),
            Err(SnapshotTransferError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        assert!(matches!(
            decode("tokenfield:v9:abcd"),
            Err(SnapshotTransferError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn corrupt_payload_is_rejected() {
        assert!(matches!(
            decode("tokenfield:v1:!!!!"),
            Err(SnapshotTransferError::InvalidEncoding(_))
        ));

        let valid_base64_garbage = "tokenfield:v1:bm90IGpzb24";
        assert!(matches!(
            decode(valid_base64_garbage),
            Err(SnapshotTransferError::InvalidPayload(_))
        ));
    }
}
