//! Domain logic - release data records and the release partitioning rules

pub mod commit;
pub mod release;
pub mod tag;

pub use commit::{Commit, CommitType, ReleaseData, RepositoryInfo};
pub use release::{
    count_by_type, parse_releases, parse_releases_with_label, sort_newest_first, ReleaseGroup,
    INCOMING_LABEL,
};
pub use tag::{has_version_prefix, is_release_version_tag, TagPolicy};
