// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests wiring PostgreSQL and Redis containers through `bootstrap::connect`.

mod common;

#[cfg(all(feature = "redis", feature = "postgres"))]
mod bootstrap_tests {
    use guildcfg::bootstrap;
    use guildcfg::domain::{ConfigPatch, GuildConfigService, GuildId, StoreError};
    use guildcfg::settings::StoreSettings;
    use std::time::Duration;
    use testcontainers::{core::WaitFor, runners::AsyncRunner, ContainerAsync, GenericImage, ImageExt};

    use crate::common as docker_helpers;

    const GUILD: GuildId = GuildId::new(81384788765712384);

    struct Stack {
        _postgres: ContainerAsync<GenericImage>,
        _redis: ContainerAsync<GenericImage>,
        settings: StoreSettings,
    }

    async fn setup_stack() -> Option<Stack> {
        if !docker_helpers::is_docker_available() {
            docker_helpers::print_docker_unavailable_warning("bootstrap integration test");
            return None;
        }

        let postgres = GenericImage::new("postgres", "16-alpine")
            .with_exposed_port(5432.into())
            .with_wait_for(WaitFor::message_on_stderr(
                "database system is ready to accept connections",
            ))
            .with_env_var("POSTGRES_USER", "bot")
            .with_env_var("POSTGRES_PASSWORD", "bot")
            .with_env_var("POSTGRES_DB", "bot")
            .start()
            .await
            .ok()?;
        let redis = GenericImage::new("redis", "7-alpine")
            .with_exposed_port(6379.into())
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"))
            .start()
            .await
            .ok()?;

        let pg_port = postgres.get_host_port_ipv4(5432).await.ok()?;
        let redis_port = redis.get_host_port_ipv4(6379).await.ok()?;

        tokio::time::sleep(Duration::from_millis(1500)).await;

        let yaml = format!(
            "database:\n  host: 127.0.0.1\n  port: {}\n  database: bot\n\
             redis:\n  host: 127.0.0.1\n  port: {}\n\
             cache:\n  ttl_secs: 3600\n",
            pg_port, redis_port
        );
        let mut settings = StoreSettings::from_yaml_str(&yaml).unwrap();
        settings.fill_from(|name| match name {
            "DB_USER" | "DB_PASSWORD" => Some("bot".to_string()),
            _ => None,
        });

        Some(Stack {
            _postgres: postgres,
            _redis: redis,
            settings,
        })
    }

    #[tokio::test]
    async fn test_bootstrap_round_trip() {
        docker_helpers::init_tracing();
        let Some(stack) = setup_stack().await else {
            return;
        };

        let service = bootstrap::connect(&stack.settings).await.unwrap();
        assert_eq!(service.policy().ttl, Duration::from_secs(3600));

        assert!(service.get_configuration(GUILD).await.unwrap().is_default());

        service
            .update_configuration(GUILD, &ConfigPatch::new().prefix("?").xp_enabled(true))
            .await
            .unwrap();
        let config = service.get_configuration(GUILD).await.unwrap();
        assert_eq!(config.prefix.as_deref(), Some("?"));
        assert_eq!(config.xp_enabled, Some(true));

        // Now cached: the write goes through to Redis as well.
        service
            .update_configuration(GUILD, &ConfigPatch::new().mute_role_id(4))
            .await
            .unwrap();
        let config = service.get_configuration(GUILD).await.unwrap();
        assert_eq!(config.mute_role_id, Some(4));
        assert_eq!(config.prefix.as_deref(), Some("?"));

        service.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_bootstrap_rejects_incomplete_settings() {
        let settings = StoreSettings::default();

        let err = bootstrap::connect(&settings).await.err().unwrap();
        assert!(matches!(err, StoreError::SettingsError { .. }));
    }
}
