use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

/// Default directory holding garden bed content packs.
pub const CONTENT_PACKS_DIR: &str = "content_packs";

/// Manifest file name inside a pack directory.
pub const PACK_MANIFEST_FILE: &str = "pack.json";

/// Variant definitions a pack contributes.
pub const PACK_DEFINITIONS_FILE: &str = "itemDefinitions.json";

/// Default-locale strings a pack contributes.
pub const PACK_TRANSLATIONS_FILE: &str = "i18n/default.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackManifest {
    /// Display name (defaults to the directory name).
    pub name: Option<String>,
    /// Optional author, purely informational.
    pub author: Option<String>,
    /// If false, the pack is ignored.
    pub enabled: bool,
    /// Lower loads earlier; ties break on directory name.
    pub priority: i32,
}

impl Default for PackManifest {
    fn default() -> Self {
        Self {
            name: None,
            author: None,
            enabled: true,
            priority: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContentPack {
    pub id: String,
    pub dir: PathBuf,
    pub manifest: PackManifest,
}

impl ContentPack {
    pub fn definitions_path(&self) -> PathBuf {
        self.dir.join(PACK_DEFINITIONS_FILE)
    }

    pub fn translations_path(&self) -> PathBuf {
        self.dir.join(PACK_TRANSLATIONS_FILE)
    }
}

fn read_manifest(pack_dir: &Path, pack_id: &str) -> Result<PackManifest> {
    let manifest_path = pack_dir.join(PACK_MANIFEST_FILE);
    let mut manifest: PackManifest = if manifest_path.exists() {
        let contents = fs::read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", manifest_path.display()))?
    } else {
        PackManifest::default()
    };
    if manifest.name.as_deref().unwrap_or_default().is_empty() {
        manifest.name = Some(pack_id.to_string());
    }
    Ok(manifest)
}

/// Pack directories under `root`, sorted. A missing root has no packs.
pub fn pack_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err).with_context(|| format!("Failed to read {}", root.display())),
    };
    let mut dirs = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read dir entry in {}", root.display()))?
            .path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn pack_id(dir: &Path) -> String {
    dir.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| dir.display().to_string())
}

fn sort_packs(packs: &mut [ContentPack]) {
    packs.sort_by(|a, b| {
        a.manifest
            .priority
            .cmp(&b.manifest.priority)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Enabled packs in load order. Errors on the first unreadable manifest.
pub fn discover_strict(root: &Path) -> Result<Vec<ContentPack>> {
    let mut packs = Vec::new();
    for dir in pack_dirs(root)? {
        let id = pack_id(&dir);
        let manifest = read_manifest(&dir, &id)?;
        if manifest.enabled {
            packs.push(ContentPack { id, dir, manifest });
        }
    }
    sort_packs(&mut packs);
    Ok(packs)
}

/// Enabled packs in load order; packs with broken manifests are skipped with a warning.
pub fn discover_lenient(root: &Path) -> Vec<ContentPack> {
    let dirs = match pack_dirs(root) {
        Ok(dirs) => dirs,
        Err(err) => {
            warn!("Failed to scan content packs dir {}: {err:#}", root.display());
            return Vec::new();
        }
    };
    let mut packs = Vec::new();
    for dir in dirs {
        let id = pack_id(&dir);
        match read_manifest(&dir, &id) {
            Ok(manifest) if manifest.enabled => packs.push(ContentPack { id, dir, manifest }),
            Ok(_) => {}
            Err(err) => warn!(
                "Skipping content pack {} due to invalid manifest: {err:#}",
                dir.display()
            ),
        }
    }
    sort_packs(&mut packs);
    packs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_root(label: &str) -> PathBuf {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("raised_beds_{label}_{timestamp}"))
    }

    #[test]
    fn manifests_control_pack_order_and_enablement() {
        let root = unique_temp_root("packs_order");
        for (dir, manifest) in [
            ("b_pack", Some(r#"{"priority":-5}"#)),
            ("a_pack", Some(r#"{"priority":10}"#)),
            ("c_pack", None),
            ("d_pack", Some(r#"{"enabled":false,"priority":-100}"#)),
        ] {
            let pack = root.join(dir);
            fs::create_dir_all(&pack).expect("pack create");
            if let Some(manifest) = manifest {
                fs::write(pack.join(PACK_MANIFEST_FILE), manifest).expect("write manifest");
            }
        }

        let packs = discover_strict(&root).expect("discover packs");
        let ids: Vec<&str> = packs.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b_pack", "c_pack", "a_pack"]);
        let c = packs.iter().find(|p| p.id == "c_pack").expect("c_pack present");
        assert_eq!(c.manifest.name.as_deref(), Some("c_pack"));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn lenient_discovery_skips_broken_manifests() {
        let root = unique_temp_root("packs_broken");
        let broken = root.join("broken");
        fs::create_dir_all(&broken).expect("pack create");
        fs::write(broken.join(PACK_MANIFEST_FILE), "{not json").expect("write manifest");
        fs::create_dir_all(root.join("fine")).expect("pack create");

        assert!(discover_strict(&root).is_err());
        let ids: Vec<String> = discover_lenient(&root).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["fine".to_string()]);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_root_has_no_packs() {
        let root = unique_temp_root("packs_missing");
        assert!(discover_lenient(&root).is_empty());
    }
}
