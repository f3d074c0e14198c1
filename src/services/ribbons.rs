//! Ribbon metadata service.

use std::time::Duration;

use crate::cache::{CacheKey, CacheStore, Clock, get_cached_or_fetch};
use crate::domain::ribbon::Ribbon;
use crate::repository::RibbonReader;

use super::ServiceResult;

/// Ribbon definitions, cached under the longest-lived TTL; they change
/// rarely compared to listings.
pub async fn list_ribbons<R, C>(
    repo: &R,
    cache: &CacheStore<C>,
    ttl: Duration,
) -> ServiceResult<Vec<Ribbon>>
where
    R: RibbonReader,
    C: Clock,
{
    get_cached_or_fetch(cache, CacheKey::Ribbons, ttl, || async move {
        Ok(repo.list_ribbons().await?)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RibbonId;
    use crate::repository::test::TestRepository;

    #[actix_rt::test]
    async fn ribbons_are_cached_after_the_first_read() {
        let repo = TestRepository::new().with_ribbons(vec![Ribbon {
            id: RibbonId::new(1).unwrap(),
            name: "Sale".to_string(),
            html: "<span>Sale</span>".to_string(),
            bg_color: "#d9534f".to_string(),
            text_color: "#ffffff".to_string(),
        }]);
        let cache = CacheStore::new();
        let ttl = Duration::from_secs(3600);

        let first = list_ribbons(&repo, &cache, ttl).await.unwrap();
        let second = list_ribbons(&repo, &cache, ttl).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(repo.call_count(), 1);
    }
}
