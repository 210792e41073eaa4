//! Page flows driven against fake providers

mod common;

use std::sync::Arc;

use common::{BERLIN, FakeGeocoder, FakeWeather, Gate, PARIS, fixed_clock, snapshot};
use weather_page::{
    ErrorKind, FixedGeolocator, FlowOutcome, HtmlPage, PageController, PageState, Region,
    SequencePolicy, UnavailableGeolocator, ViewPort, WeatherPageError,
};

fn controller(geocoder: FakeGeocoder, weather: FakeWeather) -> PageController<HtmlPage> {
    PageController::new(Arc::new(geocoder), Arc::new(weather), HtmlPage::new())
        .with_clock(fixed_clock())
}

async fn first_conditions_text(controller: &PageController<HtmlPage>) -> Option<String> {
    controller
        .with_view(|page| page.region_text(Region::Conditions).into_iter().next())
        .await
}

#[tokio::test]
async fn test_init_clears_every_region() {
    let mut page = HtmlPage::new();
    page.set_text(Region::Place, "stale");
    page.set_text(Region::Timestamp, "stale");
    page.set_text(Region::Notice, "stale");
    page.set_text(Region::Stats, "stale");
    page.set_text(Region::Conditions, "stale");
    let controller = PageController::new(
        Arc::new(FakeGeocoder::new()),
        Arc::new(FakeWeather::new()),
        page,
    );

    controller.init().await;

    controller
        .with_view(|page| {
            for region in Region::ALL {
                assert!(page.region_text(region).is_empty(), "{region:?} not cleared");
            }
        })
        .await;
    assert_eq!(controller.state().await, PageState::Idle);
}

#[tokio::test]
async fn test_initial_load_labels_and_renders() {
    let geocoder = FakeGeocoder::new().with_place_name(BERLIN, "10115, Mitte, Berlin, Germany");
    let weather = FakeWeather::new().with_snapshot(BERLIN, snapshot(11.0, "clear sky"));
    let controller = controller(geocoder, weather);

    let outcome = controller
        .load_current_location(&FixedGeolocator(BERLIN))
        .await
        .unwrap();

    assert_eq!(outcome, FlowOutcome::Rendered);
    assert_eq!(controller.state().await, PageState::Rendered);
    controller
        .with_view(|page| {
            assert_eq!(page.label(Region::Place), "Berlin");
            assert_eq!(
                page.label(Region::Timestamp),
                "January 15, 2024 at 12:00 PM"
            );
            assert_eq!(page.label(Region::Notice), "");
            let conditions = page.region_text(Region::Conditions);
            assert_eq!(conditions[0], "11°C");
            assert_eq!(conditions[1], "clear sky");
            assert_eq!(page.region_text(Region::Stats).len(), 16);
        })
        .await;
}

#[tokio::test]
async fn test_initial_load_with_short_place_name_shows_unknown() {
    let geocoder = FakeGeocoder::new().with_place_name(BERLIN, "Germany");
    let weather = FakeWeather::new().with_snapshot(BERLIN, snapshot(11.0, "clear sky"));
    let controller = controller(geocoder, weather);

    controller
        .load_current_location(&FixedGeolocator(BERLIN))
        .await
        .unwrap();

    let place = controller
        .with_view(|page| page.label(Region::Place).to_string())
        .await;
    assert_eq!(place, "Unknown");
}

#[tokio::test]
async fn test_denied_geolocation_fails_without_provider_calls() {
    let geocoder = Arc::new(FakeGeocoder::new());
    let weather = Arc::new(FakeWeather::new());
    let controller = PageController::new(geocoder.clone(), weather.clone(), HtmlPage::new());

    let err = controller
        .load_current_location(&UnavailableGeolocator::new("User denied Geolocation"))
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherPageError::GeolocationDenied(_)));
    assert_eq!(geocoder.calls(), 0);
    assert_eq!(weather.calls(), 0);
    match controller.state().await {
        PageState::Failed(reason) => assert_eq!(reason.kind, ErrorKind::Terminal),
        other => panic!("expected Failed, got {other:?}"),
    }
    let notice = controller
        .with_view(|page| page.label(Region::Notice).to_string())
        .await;
    assert!(notice.contains("Search for a city"));
}

#[tokio::test]
async fn test_blank_search_is_ignored() {
    let geocoder = Arc::new(FakeGeocoder::new());
    let weather = Arc::new(FakeWeather::new());
    let controller = PageController::new(geocoder.clone(), weather.clone(), HtmlPage::new());

    for input in ["", "   ", "\t\n"] {
        assert_eq!(controller.search(input).await.unwrap(), FlowOutcome::Ignored);
    }
    controller
        .with_view(|page| page.set_search_input("  "))
        .await;
    assert_eq!(controller.submit_search().await.unwrap(), FlowOutcome::Ignored);

    assert_eq!(geocoder.calls(), 0);
    assert_eq!(weather.calls(), 0);
    assert_eq!(controller.state().await, PageState::Idle);
}

#[tokio::test]
async fn test_search_encodes_query_and_capitalizes_label() {
    let geocoder = Arc::new(FakeGeocoder::new().with_place("new%20york", BERLIN));
    let weather = FakeWeather::new().with_snapshot(BERLIN, snapshot(11.0, "clear sky"));
    let controller = PageController::new(geocoder.clone(), Arc::new(weather), HtmlPage::new());

    controller
        .with_view(|page| page.set_search_input("new york"))
        .await;
    let outcome = controller.submit_search().await.unwrap();

    assert_eq!(outcome, FlowOutcome::Rendered);
    assert_eq!(
        geocoder.queries.lock().unwrap().as_slice(),
        ["new%20york".to_string()]
    );
    controller
        .with_view(|page| {
            assert_eq!(page.label(Region::Place), "New york");
            assert_eq!(page.search_input(), "");
            // Searches do not touch the timestamp label.
            assert_eq!(page.label(Region::Timestamp), "");
        })
        .await;
}

#[tokio::test]
async fn test_unknown_city_reports_the_typed_query() {
    let controller = controller(FakeGeocoder::new(), FakeWeather::new());

    let err = controller.search("atlantis").await.unwrap_err();

    assert!(matches!(&err, WeatherPageError::NoResults { query } if query == "atlantis"));
    let notice = controller
        .with_view(|page| page.label(Region::Notice).to_string())
        .await;
    assert_eq!(notice, "No place found for \"atlantis\".");
}

#[tokio::test]
async fn test_failed_search_keeps_previous_panels() {
    let geocoder = FakeGeocoder::new()
        .with_place("berlin", BERLIN)
        .with_place("paris", PARIS);
    let weather = FakeWeather::new()
        .with_snapshot(BERLIN, snapshot(11.0, "clear sky"))
        .with_status(PARIS, 503);
    let controller = controller(geocoder, weather);

    controller.search("berlin").await.unwrap();
    let err = controller.search("paris").await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(first_conditions_text(&controller).await.as_deref(), Some("11°C"));
    match controller.state().await {
        PageState::Failed(reason) => {
            assert_eq!(reason.kind, ErrorKind::Retryable);
            assert!(reason.message.contains("try again"));
        }
        other => panic!("expected Failed, got {other:?}"),
    }

    controller.search("berlin").await.unwrap();
    let notice = controller
        .with_view(|page| page.label(Region::Notice).to_string())
        .await;
    assert_eq!(notice, "");
    assert_eq!(controller.state().await, PageState::Rendered);
}

/// Starts a search for `alpha` that stalls in the weather fetch, completes a
/// search for `beta`, then lets `alpha` finish.
async fn overlapping_searches(policy: SequencePolicy) -> (Arc<PageController<HtmlPage>>, FlowOutcome) {
    let gate = Gate::new();
    let geocoder = FakeGeocoder::new()
        .with_place("alpha", BERLIN)
        .with_place("beta", PARIS);
    let weather = FakeWeather::new()
        .with_gated_snapshot(BERLIN, snapshot(11.0, "alpha sky"), &gate)
        .with_snapshot(PARIS, snapshot(22.0, "beta sky"));
    let controller = Arc::new(controller(geocoder, weather).with_policy(policy));

    let slow = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.search("alpha").await })
    };
    gate.entered.notified().await;

    assert_eq!(controller.search("beta").await.unwrap(), FlowOutcome::Rendered);

    gate.release.notify_one();
    let slow_outcome = slow.await.unwrap().unwrap();
    (controller, slow_outcome)
}

#[tokio::test]
async fn test_latest_submission_wins_when_guarded() {
    let (controller, slow_outcome) = overlapping_searches(SequencePolicy::LatestSubmission).await;

    assert_eq!(slow_outcome, FlowOutcome::Superseded);
    assert_eq!(first_conditions_text(&controller).await.as_deref(), Some("22°C"));
    let place = controller
        .with_view(|page| page.label(Region::Place).to_string())
        .await;
    assert_eq!(place, "Beta");
    assert_eq!(controller.last_snapshot().await.unwrap().temp, 22.0);
    assert_eq!(controller.state().await, PageState::Rendered);
}

#[tokio::test]
async fn test_last_completion_wins_when_naive() {
    let (controller, slow_outcome) = overlapping_searches(SequencePolicy::Naive).await;

    assert_eq!(slow_outcome, FlowOutcome::Rendered);
    // The stale weather lands under the newer label.
    assert_eq!(first_conditions_text(&controller).await.as_deref(), Some("11°C"));
    let place = controller
        .with_view(|page| page.label(Region::Place).to_string())
        .await;
    assert_eq!(place, "Beta");
    // the stored snapshot always matches the rendered panels
    assert_eq!(controller.last_snapshot().await.unwrap().temp, 11.0);
}
