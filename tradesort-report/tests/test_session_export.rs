use rust_decimal_macros::dec;
use std::path::PathBuf;
use tradesort_report::{load_paths, ExportScope, Session, EXPORT_HEADER};

const FIXTURES: [&str; 3] = ["fidelity_1099.csv", "robinhood_1099.csv", "coinbase_gain_loss.csv"];

fn fixture_paths() -> Vec<PathBuf> {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("tradesort-ingest")
        .join("tests")
        .join("fixtures");
    FIXTURES.iter().map(|name| dir.join(name)).collect()
}

async fn loaded_session() -> Session {
    let results = load_paths(&fixture_paths(), None).await.unwrap();
    let mut session = Session::new();
    session.add_batch(results);
    session
}

fn parse_export(bytes: Vec<u8>) -> Vec<csv::StringRecord> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes.as_slice());
    assert_eq!(rdr.headers().unwrap().iter().collect::<Vec<_>>(), EXPORT_HEADER.to_vec());
    rdr.records().map(|r| r.unwrap()).collect()
}

#[tokio::test]
async fn test_summary_across_three_brokers() {
    let session = loaded_session().await;
    let names: Vec<_> = session.files().iter().map(|f| f.filename()).collect();
    assert_eq!(names, FIXTURES.to_vec());

    let totals = session.summary().totals;
    assert_eq!(totals.files, 3);
    assert_eq!(totals.transactions, 9);
    assert_eq!(totals.short_term, 5);
    assert_eq!(totals.long_term, 4);
    assert_eq!(totals.proceeds, dec!(11130.10));
    assert_eq!(totals.cost_basis, dec!(10820.00));
    assert_eq!(totals.gain_loss, dec!(485.10));
}

#[tokio::test]
async fn test_export_reads_back_as_csv() {
    let session = loaded_session().await;

    let all = parse_export(session.export(ExportScope::All).unwrap());
    assert_eq!(all.len(), 9);
    assert_eq!(&all[0][0], "APPLE INC");
    assert_eq!(&all[0][9], "Fidelity");
    assert_eq!(&all[7][0], "USD Coin, bridged (Convert)");
    assert_eq!(&all[7][5], "");
    assert_eq!(&all[7][6], "-0.50");

    let long = parse_export(session.export(ExportScope::LongTerm).unwrap());
    assert!(long.iter().all(|r| &r[7] == "Long"));
    let sources: Vec<_> = long.iter().map(|r| r[9].to_string()).collect();
    assert_eq!(sources, vec!["Fidelity", "Fidelity", "Robinhood", "Coinbase"]);

    let short = parse_export(session.export(ExportScope::ShortTerm).unwrap());
    assert_eq!(short.len(), 5);
}

#[tokio::test]
async fn test_removing_a_file_drops_its_rows() {
    let mut session = loaded_session().await;
    session.remove_file_named("robinhood_1099.csv").unwrap();

    let totals = session.summary().totals;
    assert_eq!(totals.files, 2);
    assert_eq!(totals.transactions, 6);
    assert_eq!(totals.gain_loss, dec!(349.60));

    let rows = parse_export(session.export(ExportScope::All).unwrap());
    assert!(rows.iter().all(|r| &r[9] != "Robinhood"));
}
