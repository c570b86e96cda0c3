//! Room to livestream link map (`link.json`).

use std::path::Path;

use sheetsync_shared::{LinkMap, Result, SheetSyncError, YoutubeRow};
use tracing::{debug, instrument};

/// Fold rows into a map. A later row for the same room replaces the link.
pub fn build_link_map(rows: &[YoutubeRow]) -> LinkMap {
    rows.iter()
        .fold(LinkMap::new(), |map, row| map.with(&row.room, &row.link))
}

/// Write the map as compact JSON, replacing whatever `path` held before.
#[instrument(skip(map), fields(path = %path.display(), rooms = map.len()))]
pub async fn write_link_map(map: &LinkMap, path: &Path) -> Result<()> {
    let json = serde_json::to_string(map)
        .map_err(|e| SheetSyncError::parse(format!("failed to encode link map: {e}")))?;

    tokio::fs::write(path, json)
        .await
        .map_err(|e| SheetSyncError::io(path, e))?;

    debug!("link map written");
    Ok(())
}

/// Read a map previously written by [`write_link_map`].
pub async fn read_link_map(path: &Path) -> Result<LinkMap> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SheetSyncError::io(path, e))?;

    serde_json::from_str(&content)
        .map_err(|e| SheetSyncError::parse(format!("{}: invalid link map: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn row(room: &str, link: &str) -> YoutubeRow {
        YoutubeRow {
            room: room.into(),
            link: link.into(),
        }
    }

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sheetsync-links-{}", Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn duplicate_room_last_wins() {
        let map = build_link_map(&[row("A", "l1"), row("A", "l2")]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("A"), Some("l2"));
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"A":"l2"}"#);
    }

    #[test]
    fn unique_rooms_independent_of_order() {
        let forward = build_link_map(&[row("R1", "a"), row("R2", "b"), row("R3", "c")]);
        let backward = build_link_map(&[row("R3", "c"), row("R2", "b"), row("R1", "a")]);

        let mut f: Vec<_> = forward.iter().collect();
        let mut b: Vec<_> = backward.iter().collect();
        f.sort();
        b.sort();
        assert_eq!(f, b);
    }

    #[test]
    fn no_rows_is_empty_object() {
        let map = build_link_map(&[]);
        assert!(map.is_empty());
        assert_eq!(serde_json::to_string(&map).unwrap(), "{}");
    }

    #[tokio::test]
    async fn write_then_read_back() {
        let dir = temp_dir();
        let path = dir.join("link.json");
        let map = build_link_map(&[row("R0", "https://youtu.be/x"), row("TR 211", "https://youtu.be/y")]);

        write_link_map(&map, &path).await.unwrap();
        assert_eq!(read_link_map(&path).await.unwrap(), map);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, r#"{"R0":"https://youtu.be/x","TR 211":"https://youtu.be/y"}"#);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn write_replaces_previous_content() {
        let dir = temp_dir();
        let path = dir.join("link.json");
        std::fs::write(&path, r#"{"old":"value","padding":"xxxxxxxxxxxxxxxxxxxxxxxxxxxx"}"#).unwrap();

        write_link_map(&build_link_map(&[row("A", "l")]), &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"A":"l"}"#);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn write_failure_propagates() {
        let dir = temp_dir();
        let path = dir.join("missing-parent").join("link.json");

        let err = write_link_map(&LinkMap::new(), &path).await.unwrap_err();
        assert!(matches!(err, SheetSyncError::Io { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
