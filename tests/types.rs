// ABOUTME: Integration tests for type-safe identifiers and validated types.
// ABOUTME: Tests parsing, validation, and tag generation.

use chrono::{TimeZone, Utc};
use releasectl::types::*;

mod repository_tests {
    use super::*;

    #[test]
    fn parse_ecr_repository() {
        let repo =
            Repository::parse("123456789012.dkr.ecr.us-east-1.amazonaws.com/inference").unwrap();
        assert_eq!(
            repo.registry(),
            Some("123456789012.dkr.ecr.us-east-1.amazonaws.com")
        );
        assert_eq!(repo.name(), "inference");
    }

    #[test]
    fn parse_without_registry() {
        let repo = Repository::parse("org/app").unwrap();
        assert!(repo.registry().is_none());
        assert_eq!(repo.name(), "org/app");
    }

    #[test]
    fn parse_registry_with_port() {
        let repo = Repository::parse("localhost:5000/app").unwrap();
        assert_eq!(repo.registry(), Some("localhost:5000"));
    }

    #[test]
    fn tagged_repository_is_rejected() {
        assert!(Repository::parse("registry.local/app:v1").is_err());
    }

    #[test]
    fn empty_repository_is_rejected() {
        assert!(matches!(
            Repository::parse(""),
            Err(ParseImageRefError::Empty)
        ));
    }

    #[test]
    fn tagging_builds_full_reference() {
        let repo = Repository::parse("registry.local/app").unwrap();
        let image = repo.tagged(&ImageTag::new("v1.2.3").unwrap());
        assert_eq!(image.to_string(), "registry.local/app:v1.2.3");
        assert_eq!(image.registry(), Some("registry.local"));
        assert_eq!(image.tag().as_str(), "v1.2.3");
    }
}

mod tag_tests {
    use super::*;

    #[test]
    fn timestamp_tag_is_sortable() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let tag = ImageTag::from_timestamp(at, None).unwrap();
        assert_eq!(tag.as_str(), "20260102-030405");
    }

    #[test]
    fn timestamp_tag_with_prefix() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let tag = ImageTag::from_timestamp(at, Some("rc")).unwrap();
        assert_eq!(tag.as_str(), "rc-20260102-030405");
    }

    #[test]
    fn invalid_tags_are_rejected() {
        assert!(ImageTag::new("").is_err());
        assert!(ImageTag::new(".hidden").is_err());
        assert!(ImageTag::new("has space").is_err());
        assert!(ImageTag::new(&"a".repeat(129)).is_err());
    }
}

mod id_tests {
    use super::*;

    #[test]
    fn ids_trim_and_validate() {
        let cluster = ClusterId::new("  gpu-cluster ").unwrap();
        assert_eq!(cluster.as_str(), "gpu-cluster");
        assert!(ServiceId::new("").is_err());
        assert!(ServiceId::new("bad name").is_err());
    }

    #[test]
    fn arn_style_ids_are_accepted() {
        assert!(ClusterId::new("arn:aws:ecs:us-east-1:123456789012:cluster/gpu").is_ok());
    }
}
