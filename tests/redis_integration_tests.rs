// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Redis cache adapter using Docker containers.

mod common;

#[cfg(feature = "redis")]
mod redis_tests {
    use guildcfg::adapters::{InMemoryDurableStore, RedisCache};
    use guildcfg::domain::{ConfigPatch, FieldMap, GuildConfigService, GuildId};
    use guildcfg::ports::{ConfigCache, DurableStore};
    use guildcfg::service::CacheAsideConfigService;
    use std::sync::Arc;
    use std::time::Duration;
    use testcontainers::{core::WaitFor, runners::AsyncRunner, GenericImage};

    use crate::common as docker_helpers;

    const GUILD: GuildId = GuildId::new(81384788765712384);

    /// Helper to set up a Redis container and cache for testing.
    async fn setup_redis_test() -> Option<(testcontainers::ContainerAsync<GenericImage>, String, RedisCache)> {
        if !docker_helpers::is_docker_available() {
            docker_helpers::print_docker_unavailable_warning("Redis integration test");
            return None;
        }

        let redis_image = GenericImage::new("redis", "7-alpine")
            .with_exposed_port(6379.into())
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"));

        let container = redis_image.start().await.ok()?;
        let port = container.get_host_port_ipv4(6379).await.ok()?;

        let url = format!("redis://127.0.0.1:{}", port);

        // Give Redis a moment to start up
        tokio::time::sleep(Duration::from_millis(500)).await;

        let cache = RedisCache::connect(&url, "guild_configs").await.unwrap();
        Some((container, url, cache))
    }

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_redis_get_fields_absent() {
        let Some((_container, _url, cache)) = setup_redis_test().await else {
            return;
        };

        assert_eq!(cache.get_fields(GUILD).await.unwrap(), None);
        assert!(!cache.exists(GUILD).await.unwrap());
    }

    #[tokio::test]
    async fn test_redis_uses_namespaced_hash() {
        let Some((_container, url, cache)) = setup_redis_test().await else {
            return;
        };

        cache
            .set_fields(GUILD, &fields(&[("prefix", "!"), ("xp_enabled", "true")]))
            .await
            .unwrap();

        let client = redis::Client::open(url.as_str()).unwrap();
        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let raw: FieldMap = redis::cmd("HGETALL")
            .arg("guild_configs:81384788765712384")
            .query_async(&mut conn)
            .await
            .unwrap();

        assert_eq!(raw, fields(&[("prefix", "!"), ("xp_enabled", "true")]));
    }

    #[tokio::test]
    async fn test_redis_set_fields_merges() {
        let Some((_container, _url, cache)) = setup_redis_test().await else {
            return;
        };

        cache.set_fields(GUILD, &fields(&[("prefix", "!")])).await.unwrap();
        cache
            .set_fields(GUILD, &fields(&[("mute_role_id", "3")]))
            .await
            .unwrap();

        let cached = cache.get_fields(GUILD).await.unwrap().unwrap();
        assert_eq!(cached, fields(&[("prefix", "!"), ("mute_role_id", "3")]));
    }

    #[tokio::test]
    async fn test_redis_set_fields_if_present_never_creates() {
        let Some((_container, _url, cache)) = setup_redis_test().await else {
            return;
        };

        let wrote = cache
            .set_fields_if_present(GUILD, &fields(&[("prefix", "!")]))
            .await
            .unwrap();

        assert!(!wrote);
        assert!(!cache.exists(GUILD).await.unwrap());
    }

    #[tokio::test]
    async fn test_redis_set_fields_if_present_keeps_ttl() {
        let Some((_container, _url, cache)) = setup_redis_test().await else {
            return;
        };

        cache.set_fields(GUILD, &fields(&[("prefix", "!")])).await.unwrap();
        cache.set_ttl(GUILD, Duration::from_secs(100)).await.unwrap();

        let wrote = cache
            .set_fields_if_present(GUILD, &fields(&[("prefix", "?")]))
            .await
            .unwrap();
        assert!(wrote);

        let ttl = cache.ttl(GUILD).await.unwrap().unwrap();
        assert!(ttl <= Duration::from_secs(100));
        let cached = cache.get_fields(GUILD).await.unwrap().unwrap();
        assert_eq!(cached.get("prefix"), Some(&"?".to_string()));
    }

    #[tokio::test]
    async fn test_redis_entry_expires() {
        let Some((_container, _url, cache)) = setup_redis_test().await else {
            return;
        };

        cache.set_fields(GUILD, &fields(&[("prefix", "!")])).await.unwrap();
        cache.set_ttl(GUILD, Duration::from_millis(200)).await.unwrap();
        assert!(cache.exists(GUILD).await.unwrap());

        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(!cache.exists(GUILD).await.unwrap());
        assert_eq!(cache.get_fields(GUILD).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_redis_remove() {
        let Some((_container, _url, cache)) = setup_redis_test().await else {
            return;
        };

        cache.set_fields(GUILD, &fields(&[("prefix", "!")])).await.unwrap();
        cache.remove(GUILD).await.unwrap();
        assert!(!cache.exists(GUILD).await.unwrap());
    }

    #[tokio::test]
    async fn test_service_populates_redis_with_ttl() {
        let Some((_container, _url, cache)) = setup_redis_test().await else {
            return;
        };
        let cache = Arc::new(cache);
        let durable = Arc::new(InMemoryDurableStore::new());
        durable
            .upsert(GUILD, &ConfigPatch::new().prefix("?").log_channel_id(12))
            .await
            .unwrap();

        let service = CacheAsideConfigService::builder()
            .with_shared_durable_store(durable)
            .with_shared_cache(cache.clone())
            .build()
            .unwrap();

        let config = service.get_configuration(GUILD).await.unwrap();
        assert_eq!(config.prefix.as_deref(), Some("?"));

        let cached = cache.get_fields(GUILD).await.unwrap().unwrap();
        assert_eq!(cached, fields(&[("prefix", "?"), ("log_channel_id", "12")]));

        let ttl = cache.ttl(GUILD).await.unwrap().unwrap();
        assert!(ttl > Duration::from_secs(86400 - 5));
        assert!(ttl <= Duration::from_secs(86400));
    }
}
