use chrono::NaiveDate;
use httpmock::{Method::GET, MockServer};
use vn_restricted_rs::{FeedClient, HsxSource};

use crate::common::{self, HSX_PATH, hsx_empty_page, hsx_page, hsx_row};

fn client(server: &MockServer) -> FeedClient {
    FeedClient::builder()
        .hsx_url(common::hsx_url(server))
        .retry_config(common::fast_retry())
        .build()
        .unwrap()
}

#[tokio::test]
async fn fetch_page_sends_grid_query_and_user_agent() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path(HSX_PATH)
            .query_param("_search", "false")
            .query_param("rows", "30")
            .query_param("page", "3")
            .query_param("sidx", "id")
            .query_param("sord", "desc")
            .header_exists("user-agent");
        then.status(200)
            .header("content-type", "application/json")
            .body(hsx_page(&[hsx_row("AAA", "A Corp", "01/01/2024", "r")]));
    });

    let rows = HsxSource::new(&client(&server)).fetch_page(3).await.unwrap();
    mock.assert();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cell(1), Some("AAA"));
    assert_eq!(rows[0].len(), 8);
}

#[tokio::test]
async fn fetch_all_stops_at_the_first_empty_page() {
    let server = MockServer::start();
    let bodies = [
        hsx_page(&[hsx_row("P1A", "n", "01/01/2024", "r"), hsx_row("P1B", "n", "01/01/2024", "r")]),
        hsx_page(&[hsx_row("P2A", "n", "01/01/2024", "r")]),
        hsx_page(&[hsx_row("P3A", "n", "01/01/2024", "r"), hsx_row("P3B", "n", "01/01/2024", "r")]),
        hsx_empty_page(),
        hsx_page(&[hsx_row("P5A", "n", "01/01/2024", "r")]),
    ];
    let mocks: Vec<_> = bodies
        .iter()
        .enumerate()
        .map(|(i, body)| {
            let page = (i + 1).to_string();
            server.mock(|when, then| {
                when.method(GET).path(HSX_PATH).query_param("page", page.as_str());
                then.status(200).body(body.as_str());
            })
        })
        .collect();

    let rows = HsxSource::new(&client(&server)).fetch_all().await.unwrap();

    let tickers: Vec<_> = rows.iter().map(|r| r.cell(1).unwrap()).collect();
    assert_eq!(tickers, ["P1A", "P1B", "P2A", "P3A", "P3B"]);
    for m in &mocks[..4] {
        m.assert_hits(1);
    }
    mocks[4].assert_hits(0);
}

#[tokio::test]
async fn fetch_all_respects_the_page_ceiling() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path(HSX_PATH);
        then.status(200)
            .body(hsx_page(&[hsx_row("SAME", "n", "01/01/2024", "r")]));
    });

    let client = FeedClient::builder()
        .hsx_url(common::hsx_url(&server))
        .max_pages(4)
        .build()
        .unwrap();
    let rows = HsxSource::new(&client).fetch_all().await.unwrap();

    assert_eq!(rows.len(), 4);
    mock.assert_hits(4);
}

#[tokio::test]
async fn fetch_records_drops_short_rows_and_bad_dates() {
    let server = MockServer::start();
    let page1 = hsx_page(&[
        vec!["1", "SIX", "x", "y", "Six cells", "01/01/2024"],
        vec!["2", "SEVEN", "x", "y", "Seven cells", "02/01/2024", "<b>ok</b>"],
        hsx_row("BAD", "Bad date", "2024-01-03", "r"),
        hsx_row("GOOD", " Good Co ", "04/01/2024", "<p>Lỗ <em>3 năm</em></p>"),
    ]);
    server.mock(|when, then| {
        when.method(GET).path(HSX_PATH).query_param("page", "1");
        then.status(200).body(page1.as_str());
    });
    server.mock(|when, then| {
        when.method(GET).path(HSX_PATH).query_param("page", "2");
        then.status(200).body(hsx_empty_page());
    });

    let recs = HsxSource::new(&client(&server)).fetch_records().await.unwrap();

    let tickers: Vec<_> = recs.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(tickers, ["SEVEN", "GOOD"]);
    assert_eq!(recs[0].reason, "ok");
    assert_eq!(recs[1].name, "Good Co");
    assert_eq!(recs[1].reason, "Lỗ 3 năm");
    assert_eq!(recs[1].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
}

#[tokio::test]
async fn malformed_or_rowless_bodies_end_pagination() {
    for body in ["<html>maintenance</html>", r#"{"page":1,"total":0}"#, r#"{"rows":null}"#] {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(GET).path(HSX_PATH).query_param("page", "1");
            then.status(200).body(body);
        });
        let second = server.mock(|when, then| {
            when.method(GET).path(HSX_PATH).query_param("page", "2");
            then.status(200).body(hsx_page(&[hsx_row("X", "n", "01/01/2024", "r")]));
        });

        let rows = HsxSource::new(&client(&server)).fetch_all().await.unwrap();
        assert!(rows.is_empty(), "body {body:?}");
        first.assert_hits(1);
        second.assert_hits(0);
    }
}

#[tokio::test]
async fn numeric_and_null_cells_are_stringified() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(HSX_PATH).query_param("page", "1");
        then.status(200).body(
            r#"{"rows":[{"id":7,"cell":[7,"NUM",null,1.5,"Numeric Co","09/09/2020","<i>r</i>"]}]}"#,
        );
    });

    let rows = HsxSource::new(&client(&server)).fetch_page(1).await.unwrap();
    assert_eq!(rows[0].cells, ["7", "NUM", "", "1.5", "Numeric Co", "09/09/2020", "<i>r</i>"]);
}
