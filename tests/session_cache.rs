use sales_dashboard::data::{session, NormalizeOptions};
use std::io::Write;
use std::path::Path;

#[test]
fn session_table_is_loaded_once() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(
        file,
        "product_name,category,discounted_price,actual_price,discount_percentage,rating,rating_count"
    )
    .unwrap();
    writeln!(file, "Cable,Electronics|Cables,₹399,\"₹1,099\",64%,4.2,\"24,269\"").unwrap();
    file.flush().unwrap();

    assert!(session::session().is_none());

    // a failed load leaves the cache empty
    let missing = Path::new("definitely/not/here.csv");
    assert!(session::load_session(missing, &NormalizeOptions::default()).is_err());
    assert!(session::session().is_none());

    let first = session::load_session(file.path(), &NormalizeOptions::default()).unwrap();
    assert_eq!(first.row_count(), 1);

    // once cached, the source is never read again
    let path = file.path().to_path_buf();
    drop(file);
    assert!(!path.exists());

    let second = session::load_session(&path, &NormalizeOptions::default()).unwrap();
    assert!(std::ptr::eq(first, second));

    let other = session::load_session(missing, &NormalizeOptions::default()).unwrap();
    assert!(std::ptr::eq(first, other));
    assert!(std::ptr::eq(first, session::session().unwrap()));
}
