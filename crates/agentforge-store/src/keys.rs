//! Key layout builders for the control plane's ordered keyspace (spec §6.2).
//!
//! All keys are plain ASCII byte strings so lexicographic byte order matches
//! the intended scan order. `audit` keys zero-pad the nanosecond timestamp
//! to 20 digits (enough for any `i64`/`u64` nanos value) so ordering by
//! bytes matches ordering by time regardless of digit count.

const AUDIT_TS_WIDTH: usize = 20;

pub fn live(kind: &str, id: &str) -> Vec<u8> {
    format!("live/{kind}/{id}").into_bytes()
}

pub fn live_prefix(kind: &str) -> Vec<u8> {
    format!("live/{kind}/").into_bytes()
}

pub fn slug_index(kind: &str, org_or_local: &str, slug: &str) -> Vec<u8> {
    format!("slug-index/{kind}/{org_or_local}/{slug}").into_bytes()
}

pub fn slug_index_prefix(kind: &str, org_or_local: &str) -> Vec<u8> {
    format!("slug-index/{kind}/{org_or_local}/").into_bytes()
}

pub fn audit(kind: &str, id: &str, updated_at_nanos: i64) -> Vec<u8> {
    format!(
        "audit/{kind}/{id}/{:0width$}",
        updated_at_nanos,
        width = AUDIT_TS_WIDTH
    )
    .into_bytes()
}

pub fn audit_prefix(kind: &str, id: &str) -> Vec<u8> {
    format!("audit/{kind}/{id}/").into_bytes()
}

pub fn artifact(sha256_hex: &str) -> Vec<u8> {
    format!("artifact/{sha256_hex}").into_bytes()
}

pub fn artifact_ref(kind: &str, id: &str, version_hash: &str) -> Vec<u8> {
    format!("artifact-ref/{kind}/{id}/{version_hash}").into_bytes()
}

pub fn artifact_ref_prefix(kind: &str, id: &str) -> Vec<u8> {
    format!("artifact-ref/{kind}/{id}/").into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_keys_sort_by_time_not_digit_count() {
        let early = audit("skill", "skl-1", 9);
        let late = audit("skill", "skl-1", 123_456_789_012);
        assert!(early < late, "zero-padded nanos must sort lexicographically");
    }

    #[test]
    fn live_prefix_is_a_prefix_of_live_key() {
        let key = live("skill", "skl-1");
        assert!(key.starts_with(&live_prefix("skill")));
    }

    #[test]
    fn slug_index_distinguishes_org_scope() {
        let a = slug_index("skill", "org-1", "my-skill");
        let b = slug_index("skill", "local", "my-skill");
        assert_ne!(a, b);
    }
}
