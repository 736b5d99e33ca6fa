use std::sync::Arc;
use std::time::Duration;

use axum::{Router, http::StatusCode, routing::get};
use halo_core::{HttpProbe, ImageSetClient, RetryPolicy};
use halo_model::{ImageSet, ResourceDescriptor, SlotVariant};
use halo_server::{
    AppState, create_app,
    watch::{WatchOptions, watch},
};
use tokio::net::TcpListener;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Serve `create_app` together with two image routes on one local port.
async fn spawn_server(
    build: impl FnOnce(&str) -> ImageSet,
) -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base = format!("http://{}", listener.local_addr()?);

    let images = Router::new()
        .route("/img/ok", get(|| async { "pixels" }))
        .route("/img/missing", get(|| async { StatusCode::NOT_FOUND }))
        .route(
            "/down/api/images",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
    let app = images.merge(create_app(AppState::new(build(&base))));

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(base)
}

fn options() -> WatchOptions {
    WatchOptions {
        policy: RetryPolicy::default().with_backoff(Duration::from_millis(20)),
        location: Some("Moradabad, Uttar Pradesh".into()),
        follow: false,
    }
}

#[tokio::test]
async fn watch_prints_until_every_slot_settles() -> anyhow::Result<()> {
    let base = spawn_server(|base| {
        ImageSet::new(
            "Super 30",
            vec![
                ResourceDescriptor::ready(format!("{base}/img/ok")),
                ResourceDescriptor::ready(format!("{base}/img/missing")),
                ResourceDescriptor::flagged(format!("{base}/img/ok")),
                ResourceDescriptor::not_ready(format!("{base}/img/ok")),
            ],
        )
    })
    .await?;

    let client = ImageSetClient::new(&format!("{base}/api/images"), TIMEOUT)?;
    let mut out = Vec::new();
    let view = tokio::time::timeout(
        Duration::from_secs(10),
        watch(
            &client,
            Arc::new(HttpProbe::new(TIMEOUT)?),
            &options(),
            &mut out,
        ),
    )
    .await??
    .expect("image set has data");

    assert!(view.has_error);
    assert_eq!(view.slots[0].explanation, "Loaded");
    assert_eq!(view.slots[1].variant, SlotVariant::Error);
    assert_eq!(
        view.slots[1].explanation,
        "Error after retries (Retry count: 3)"
    );
    assert_eq!(view.slots[2].explanation, "Backend error");
    assert_eq!(view.slots[3].explanation, "Not ready");

    let printed = String::from_utf8(out)?;
    assert!(printed.starts_with("Loading images...\n"));
    assert!(printed.contains("Moradabad, Uttar Pradesh"));
    assert!(
        printed.contains("[2] Error - Error after retries (Retry count: 3)")
    );
    Ok(())
}

#[tokio::test]
async fn watch_reports_source_failure() -> anyhow::Result<()> {
    let base = spawn_server(|_| {
        ImageSet::new("Unused", vec![ResourceDescriptor::ready("https://x")])
    })
    .await?;

    let client =
        ImageSetClient::new(&format!("{base}/down/api/images"), TIMEOUT)?;
    let mut out = Vec::new();
    let err = watch(
        &client,
        Arc::new(HttpProbe::new(TIMEOUT)?),
        &options(),
        &mut out,
    )
    .await
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Error Loading Images: Failed to fetch images: Internal Server Error"
    );
    assert!(String::from_utf8(out)?.ends_with(
        "Error Loading Images: Failed to fetch images: Internal Server Error\n"
    ));
    Ok(())
}
