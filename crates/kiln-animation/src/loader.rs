//! TOML-based animation clip loading

use kiln_core::{AnimationClip, ClipLibrary, KilnError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top level of a `.anim.toml` file
#[derive(Debug, Deserialize)]
struct ClipFile {
    #[serde(default)]
    animations: Vec<AnimationClip>,
}

/// Load every clip from a `.anim.toml` file.
///
/// ```toml
/// [[animations]]
/// name = "walk"
/// fps = 4
/// loop = true
/// frames = [
///   [ { component = "", key = "positionX", value = 0.0, interpolate = true } ],
///   [ { component = "", key = "positionX", value = 8.0, interpolate = true } ],
/// ]
/// ```
pub fn load_clips_from_file(path: &Path) -> Result<Vec<AnimationClip>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        KilnError::AnimationError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    load_clips_from_str(&content, path)
}

/// Parse clips from a TOML string; `path` is only used in error messages.
pub fn load_clips_from_str(content: &str, path: &Path) -> Result<Vec<AnimationClip>> {
    let file: ClipFile = toml::from_str(content).map_err(|e| {
        KilnError::AnimationError(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    for (i, clip) in file.animations.iter().enumerate() {
        clip.validate().map_err(|e| {
            KilnError::ConfigurationError(format!("{} clip #{}: {}", path.display(), i, e))
        })?;
        if file.animations[..i].iter().any(|c| c.name == clip.name) {
            return Err(KilnError::ConfigurationError(format!(
                "{} defines clip '{}' more than once",
                path.display(),
                clip.name
            )));
        }
    }

    Ok(file.animations)
}

/// Every `*.anim.toml` file directly inside `dir`, sorted by path
pub fn clip_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_clip = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".anim.toml"));
        if is_clip && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load every clip file in `dir` into `library`, returning the number of
/// clips added. Later files replace same-named clips from earlier ones.
pub fn load_clip_dir(dir: &Path, library: &mut ClipLibrary) -> Result<usize> {
    let mut added = 0;
    for path in clip_files_in(dir)? {
        let clips = load_clips_from_file(&path)?;
        log::debug!("Loaded {} clip(s) from {}", clips.len(), path.display());
        added += clips.len();
        for clip in clips {
            library.add(clip);
        }
    }
    log::info!("Loaded {} animation clip(s) from {}", added, dir.display());
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::AttributeValue;
    use std::fs;

    const WALK: &str = r#"
[[animations]]
name = "walk"
fps = 4
loop = true
frames = [
  [ { component = "", key = "positionX", value = 0.0, interpolate = true } ],
  [ { component = "", key = "positionX", value = 8.0, interpolate = true },
    { component = "render", key = "texture", value = "walk_2" } ],
]

[[animations]]
name = "blink"
fps = -2
"#;

    #[test]
    fn parse_clip_file() {
        let clips = load_clips_from_str(WALK, Path::new("walk.anim.toml")).unwrap();
        assert_eq!(clips.len(), 2);

        let walk = &clips[0];
        assert_eq!(walk.name, "walk");
        assert_eq!(walk.fps, 4);
        assert!(walk.looping);
        assert_eq!(walk.frame_count(), 2);

        let second = walk.frame(1).unwrap();
        assert_eq!(second.len(), 2);
        let action = second.action(0).unwrap();
        assert!(action.interpolate);
        assert_eq!(action.value, AttributeValue::Float(8.0));
        assert_eq!(second.action(1).unwrap().value, AttributeValue::Text("walk_2".into()));
        assert!(!second.action(1).unwrap().interpolate);

        let blink = &clips[1];
        assert!(blink.is_reversed());
        assert!(!blink.looping);
        assert_eq!(blink.frame_count(), 0);
    }

    #[test]
    fn reject_zero_fps() {
        let toml_str = r#"
[[animations]]
name = "bad"
fps = 0
"#;
        let result = load_clips_from_str(toml_str, Path::new("bad.anim.toml"));
        assert!(matches!(result, Err(KilnError::ConfigurationError(_))));
    }

    #[test]
    fn reject_duplicate_names() {
        let toml_str = r#"
[[animations]]
name = "a"
fps = 1

[[animations]]
name = "a"
fps = 2
"#;
        assert!(load_clips_from_str(toml_str, Path::new("dup.anim.toml")).is_err());
    }

    #[test]
    fn reject_malformed_toml() {
        let result = load_clips_from_str("[[animations]\nname =", Path::new("broken.anim.toml"));
        assert!(matches!(result, Err(KilnError::AnimationError(_))));
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("walk.anim.toml"), WALK).unwrap();
        fs::write(
            dir.path().join("jump.anim.toml"),
            "[[animations]]\nname = \"jump\"\nfps = 10\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.toml"), "not = 'a clip'").unwrap();

        let files = clip_files_in(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("jump.anim.toml"));

        let mut library = ClipLibrary::new();
        let added = load_clip_dir(dir.path(), &mut library).unwrap();
        assert_eq!(added, 3);
        assert_eq!(library.names(), vec!["blink", "jump", "walk"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_clips_from_file(&dir.path().join("nope.anim.toml"));
        assert!(matches!(result, Err(KilnError::AnimationError(_))));
    }
}
