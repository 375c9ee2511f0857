//! Export run written to CSV on disk

use chrono::NaiveDate;
use std::sync::Arc;
use tempfile::TempDir;

use order_comment_exporter::downloader::ExportExecutor;
use order_comment_exporter::fetcher::{HttpResponse, ShopFetcher};
use order_comment_exporter::output::csv::CsvMatchWriter;
use order_comment_exporter::output::{MatchWriter, COLUMNS};
use order_comment_exporter::DateWindow;

use crate::support::stub_transport::{
    events_body, events_url, orders_body, test_config, StubTransport,
};

#[tokio::test]
async fn test_export_rows_written_in_encounter_order() {
    let config = test_config();
    let transport = Arc::new(
        StubTransport::new()
            .route(
                config.orders_url(),
                HttpResponse::ok(orders_body(&[
                    (1, "#1001", "2024-03-05T10:00:00Z"),
                    (2, "#1002", "2024-03-06T10:00:00+01:00"),
                ])),
            )
            .route(
                events_url(1),
                HttpResponse::ok(events_body(&[
                    ("Chiara Azzaretto", "CA verificato", "2024-03-05T11:00:00Z"),
                    ("System", "Order was placed", "2024-03-05T10:00:01Z"),
                    ("azzaretto chiara", "seconda ca, con virgola", "2024-03-05T12:00:00Z"),
                ])),
            )
            .route(
                events_url(2),
                HttpResponse::ok(events_body(&[(
                    "  CHIARA AZZARETTO ",
                    "Caricato",
                    "2024-03-06T11:00:00+01:00",
                )])),
            ),
    );

    let window = DateWindow::new(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    )
    .unwrap();
    let report = ExportExecutor::new(ShopFetcher::with_transport(transport, &config), &config)
        .run(window)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ordini_con_ca.csv");
    let mut writer = CsvMatchWriter::new(&path).unwrap();
    writer.write_matches(&report.rows).unwrap();
    writer.close_and_sync().unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    assert_eq!(
        reader.headers().unwrap().iter().collect::<Vec<_>>(),
        COLUMNS.to_vec()
    );

    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    assert_eq!(
        rows,
        vec![
            vec!["#1001", "2024-03-05T10:00:00Z", "CA verificato", "2024-03-05T11:00:00Z"],
            vec![
                "#1001",
                "2024-03-05T10:00:00Z",
                "seconda ca, con virgola",
                "2024-03-05T12:00:00Z"
            ],
            vec![
                "#1002",
                "2024-03-06T10:00:00+01:00",
                "Caricato",
                "2024-03-06T11:00:00+01:00"
            ],
        ]
    );
}
