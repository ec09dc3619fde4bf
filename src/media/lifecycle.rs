//! Product media lifecycle: computes, as a pure value, what the next
//! thumbnail/gallery state is and which files stop being referenced. The
//! caller persists the row first, then applies the deletion set with
//! [`spawn_file_deletions`]; file removal is fire-and-forget and never
//! affects the outcome of the triggering request.

use std::path::{Path, PathBuf};

/// Upper bound on `additional_images` entries after any successful write.
pub const GALLERY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct MediaPlan {
    pub thumbnail_url: Option<String>,
    pub gallery: Vec<String>,
    /// Storage-relative paths whose files are no longer referenced.
    pub to_delete: Vec<String>,
}

/// Plan for a fresh product: staged files become the record, nothing to
/// delete. Gallery entries beyond the slot budget are dropped.
pub fn plan_create(staged_thumbnail: Option<String>, mut staged_gallery: Vec<String>) -> MediaPlan {
    staged_gallery.truncate(GALLERY_LIMIT);
    MediaPlan {
        thumbnail_url: staged_thumbnail,
        gallery: staged_gallery,
        to_delete: Vec::new(),
    }
}

/// Plan for an update. Current gallery entries missing from the retained set
/// are scheduled for deletion; newly staged files are appended after the
/// retained ones. If the combined list exceeds [`GALLERY_LIMIT`] it is
/// trimmed from the tail, and the trimmed entries join the deletion set so
/// their staged files do not orphan. A staged thumbnail replaces the old one
/// and schedules the old file; without one the thumbnail is left untouched.
pub fn plan_update(
    current_thumbnail: Option<&str>,
    current_gallery: &[String],
    retained: &[String],
    staged_thumbnail: Option<String>,
    staged_gallery: Vec<String>,
) -> MediaPlan {
    let mut to_delete: Vec<String> = current_gallery
        .iter()
        .filter(|path| !retained.contains(path))
        .cloned()
        .collect();

    let mut gallery = retained.to_vec();
    gallery.extend(staged_gallery);
    while gallery.len() > GALLERY_LIMIT {
        if let Some(dropped) = gallery.pop() {
            to_delete.push(dropped);
        }
    }

    let thumbnail_url = match staged_thumbnail {
        Some(new) => {
            if let Some(old) = current_thumbnail {
                if old != new {
                    to_delete.push(old.to_owned());
                }
            }
            Some(new)
        }
        None => current_thumbnail.map(str::to_owned),
    };

    MediaPlan {
        thumbnail_url,
        gallery,
        to_delete,
    }
}

/// Every file referenced by a product about to be removed.
pub fn plan_delete(thumbnail_url: Option<&str>, gallery: &[String]) -> Vec<String> {
    let mut to_delete = gallery.to_vec();
    if let Some(thumb) = thumbnail_url {
        if !thumb.is_empty() {
            to_delete.push(thumb.to_owned());
        }
    }
    to_delete
}

/// Maps a storage-relative path (leading `/`) onto the storage root.
pub fn disk_path(storage_root: &Path, storage_relative: &str) -> PathBuf {
    storage_root.join(storage_relative.trim_start_matches('/'))
}

/// Best-effort removal of unreferenced files, detached from the request.
/// Failures (including "already absent") are logged and otherwise ignored.
pub fn spawn_file_deletions(storage_root: &Path, paths: Vec<String>) {
    for path in paths {
        // Paths come from our own rows, but refuse to step outside the root.
        if path.contains("..") {
            tracing::warn!(path = %path, "refusing to delete suspicious image path");
            continue;
        }
        let target = disk_path(storage_root, &path);
        tokio::spawn(async move {
            if let Err(err) = tokio::fs::remove_file(&target).await {
                tracing::warn!(
                    path = %target.display(),
                    error = %err,
                    "failed to delete image file"
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| (*item).to_owned()).collect()
    }

    #[test]
    fn create_keeps_first_five_gallery_files() {
        let staged = paths(&["/p/1", "/p/2", "/p/3", "/p/4", "/p/5", "/p/6", "/p/7"]);
        let plan = plan_create(Some("/p/t.png".to_owned()), staged);

        assert_eq!(plan.thumbnail_url.as_deref(), Some("/p/t.png"));
        assert_eq!(plan.gallery, paths(&["/p/1", "/p/2", "/p/3", "/p/4", "/p/5"]));
        assert!(plan.to_delete.is_empty());
    }

    #[test]
    fn update_deletes_everything_outside_the_retained_set() {
        let plan = plan_update(
            None,
            &paths(&["/a", "/b", "/c"]),
            &paths(&["/b"]),
            None,
            paths(&["/new"]),
        );

        assert_eq!(plan.gallery, paths(&["/b", "/new"]));
        assert_eq!(plan.to_delete, paths(&["/a", "/c"]));
    }

    #[test]
    fn update_with_empty_retained_set_clears_the_gallery() {
        let plan = plan_update(None, &paths(&["/a", "/b"]), &[], None, Vec::new());

        assert!(plan.gallery.is_empty());
        assert_eq!(plan.to_delete, paths(&["/a", "/b"]));
    }

    #[test]
    fn update_trims_overflow_and_reclaims_staged_files() {
        let retained = paths(&["/r1", "/r2", "/r3", "/r4"]);
        let plan = plan_update(
            None,
            &retained,
            &retained,
            None,
            paths(&["/n1", "/n2", "/n3"]),
        );

        assert_eq!(plan.gallery, paths(&["/r1", "/r2", "/r3", "/r4", "/n1"]));
        assert_eq!(plan.to_delete, paths(&["/n3", "/n2"]));
    }

    #[test]
    fn staged_thumbnail_replaces_and_schedules_the_old_file() {
        let plan = plan_update(
            Some("/old.png"),
            &[],
            &[],
            Some("/new.png".to_owned()),
            Vec::new(),
        );

        assert_eq!(plan.thumbnail_url.as_deref(), Some("/new.png"));
        assert_eq!(plan.to_delete, paths(&["/old.png"]));
    }

    #[test]
    fn missing_staged_thumbnail_leaves_the_current_one() {
        let plan = plan_update(Some("/keep.png"), &[], &[], None, Vec::new());

        assert_eq!(plan.thumbnail_url.as_deref(), Some("/keep.png"));
        assert!(plan.to_delete.is_empty());
    }

    #[test]
    fn delete_covers_thumbnail_and_gallery() {
        let doomed = plan_delete(Some("/t.png"), &paths(&["/g1"]));
        assert_eq!(doomed, paths(&["/g1", "/t.png"]));

        assert!(plan_delete(None, &[]).is_empty());
    }

    #[test]
    fn disk_path_strips_the_leading_slash() {
        let target = disk_path(Path::new("./public"), "/productImages/a.png");
        assert_eq!(target, Path::new("./public/productImages/a.png"));
    }
}
