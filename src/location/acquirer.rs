//! Location acquirer: one provider request per call, result shown in the session.

use super::providers::LocationProvider;
use super::types::{AcquireError, Coordinate, LocationError, LocationOptions};
use crate::display;
use crate::session::Session;
use chrono::{TimeDelta, Utc};
use std::sync::Arc;

pub struct LocationAcquirer {
    provider: Option<Arc<dyn LocationProvider>>,
    options: LocationOptions,
}

impl LocationAcquirer {
    pub fn new(provider: Arc<dyn LocationProvider>) -> Self {
        Self {
            provider: Some(provider),
            options: LocationOptions::default(),
        }
    }

    /// An acquirer for a host without any location capability.
    pub fn unsupported() -> Self {
        Self {
            provider: None,
            options: LocationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LocationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &LocationOptions {
        &self.options
    }

    /// Request a fix and show it.
    ///
    /// On success the session coordinate is replaced, the location region
    /// shows the coordinate with a Google Maps link, and the map centres on
    /// it with a marker. On failure only the region changes.
    pub async fn acquire_location(&self, session: &Session) -> Result<Coordinate, AcquireError> {
        let region = session.location_region();
        let ticket = region.begin();

        match self.request_fix().await {
            Ok(coordinate) => {
                log::debug!("location fix at {coordinate}");
                session.apply_fix(ticket, coordinate, display::location_html(coordinate));
                Ok(coordinate)
            }
            Err(err) => {
                log::info!("location request failed: {err:?}");
                region.write(ticket, err.to_string());
                Err(err)
            }
        }
    }

    async fn request_fix(&self) -> Result<Coordinate, AcquireError> {
        let provider = self.provider.as_ref().ok_or(AcquireError::Unsupported)?;

        let requested_at = Utc::now();
        let position = tokio::time::timeout(
            self.options.timeout,
            provider.current_position(&self.options),
        )
        .await
        .map_err(|_| LocationError::Timeout)??;

        // A zero maximum age still accepts fixes taken after the request began.
        let too_old = TimeDelta::from_std(self.options.maximum_age)
            .ok()
            .and_then(|age| requested_at.checked_sub_signed(age))
            .is_some_and(|oldest| position.timestamp < oldest);
        if too_old {
            log::warn!("discarding fix from {} (older than maximum age)", position.timestamp);
            return Err(LocationError::PositionUnavailable.into());
        }

        if let Some(metres) = position.accuracy {
            log::debug!("fix accuracy {metres:.0} m");
        }
        Ok(position.coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::providers::{FixedProvider, PositionFuture};
    use crate::location::types::Position;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers every request with the same outcome after `delay`.
    struct ScriptedProvider {
        outcome: Result<Position, LocationError>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(outcome: Result<Position, LocationError>) -> Arc<Self> {
            Self::delayed(outcome, Duration::ZERO)
        }

        fn delayed(outcome: Result<Position, LocationError>, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                delay,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl LocationProvider for ScriptedProvider {
        fn current_position(&self, _options: &LocationOptions) -> PositionFuture<'_> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                tokio::time::sleep(self.delay).await;
                self.outcome.clone()
            })
        }
    }

    #[tokio::test]
    async fn test_fix_is_shown_and_stored() {
        let here = Coordinate::new(-23.5, -46.6);
        let acquirer = LocationAcquirer::new(Arc::new(FixedProvider::new(here)));
        let session = Session::new();

        let coord = acquirer.acquire_location(&session).await.unwrap();

        assert_eq!(coord, here);
        assert_eq!(session.coordinate(), Some(here));
        let html = session.location_region().html();
        assert!(html.contains("-23.5"));
        assert!(html.contains("-46.6"));
        assert!(html.contains("https://www.google.com.br/maps/@-23.5,-46.6,20z?entry=ttu"));

        let map = session.map();
        assert_eq!(map.center(), here);
        assert_eq!(map.zoom(), 18);
        assert_eq!(map.markers()[0].popup.as_deref(), Some("📍 Você está aqui!"));
        assert!(map.markers()[0].popup_open);
    }

    #[tokio::test]
    async fn test_unsupported_leaves_map_alone() {
        let acquirer = LocationAcquirer::unsupported();
        let session = Session::new();
        let before = session.map();

        let err = acquirer.acquire_location(&session).await.unwrap_err();

        assert_eq!(err, AcquireError::Unsupported);
        assert_eq!(
            session.location_region().html(),
            "Geolocalização não é suportada por este navegador"
        );
        assert_eq!(session.map(), before);
        assert!(session.coordinate().is_none());
    }

    #[tokio::test]
    async fn test_each_error_kind_is_displayed() {
        let cases = [
            (LocationError::PermissionDenied, "⛔ O usuário negou o acesso à localização."),
            (LocationError::PositionUnavailable, "❌ A localização não está disponível."),
            (LocationError::Timeout, "⏳ A solicitação expirou."),
            (LocationError::Unknown, "⚠️ Erro desconhecido ao tentar obter a localização."),
        ];
        for (kind, message) in cases {
            let provider = ScriptedProvider::new(Err(kind));
            let acquirer = LocationAcquirer::new(provider.clone());
            let session = Session::new();

            let err = acquirer.acquire_location(&session).await.unwrap_err();

            assert_eq!(err, AcquireError::Location(kind));
            assert_eq!(session.location_region().html(), message);
            assert!(session.coordinate().is_none());
            assert!(session.map().markers().is_empty());
            assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_fix() {
        let here = Coordinate::new(10.0, 20.0);
        let session = Session::new();
        LocationAcquirer::new(Arc::new(FixedProvider::new(here)))
            .acquire_location(&session)
            .await
            .unwrap();

        let failing = LocationAcquirer::new(ScriptedProvider::new(Err(LocationError::PermissionDenied)));
        failing.acquire_location(&session).await.unwrap_err();

        assert_eq!(session.coordinate(), Some(here));
        assert_eq!(session.map().markers().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let provider = ScriptedProvider::delayed(
            Ok(Position::now(Coordinate::new(0.0, 0.0))),
            Duration::from_secs(30),
        );
        let acquirer = LocationAcquirer::new(provider);
        let session = Session::new();

        let err = acquirer.acquire_location(&session).await.unwrap_err();

        assert_eq!(err, AcquireError::Location(LocationError::Timeout));
        assert_eq!(session.location_region().html(), "⏳ A solicitação expirou.");
    }

    #[tokio::test]
    async fn test_cached_fix_is_rejected() {
        let mut stale = Position::now(Coordinate::new(1.0, 1.0));
        stale.timestamp -= TimeDelta::minutes(10);
        let acquirer = LocationAcquirer::new(ScriptedProvider::new(Ok(stale)));
        let session = Session::new();

        let err = acquirer.acquire_location(&session).await.unwrap_err();
        assert_eq!(err, AcquireError::Location(LocationError::PositionUnavailable));
    }

    #[tokio::test]
    async fn test_maximum_age_allows_recent_fix() {
        let mut recent = Position::now(Coordinate::new(1.0, 1.0));
        recent.timestamp -= TimeDelta::minutes(1);
        let options = LocationOptions {
            maximum_age: Duration::from_secs(300),
            ..LocationOptions::default()
        };
        let acquirer = LocationAcquirer::new(ScriptedProvider::new(Ok(recent))).with_options(options);

        let coord = acquirer.acquire_location(&Session::new()).await.unwrap();
        assert_eq!(coord, Coordinate::new(1.0, 1.0));
    }
}
