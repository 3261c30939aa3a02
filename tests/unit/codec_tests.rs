use syncvio::codec::{base_name, LocaleEncoding, PathCodec};
use syncvio::Error;

#[test]
fn utf8_round_trips_exactly() -> syncvio::Result<()> {
    let codec = PathCodec::new(LocaleEncoding::Utf8);
    for path in ["/tmp/sync_test", "/tmp/\u{65e5}\u{672c}/file.txt", "relative/dir/"] {
        let encoded = codec.encode(path)?;
        assert_eq!(codec.decode(encoded.as_bytes())?, path);
    }
    Ok(())
}

#[test]
fn latin1_round_trips_representable_paths() -> syncvio::Result<()> {
    let codec = PathCodec::new(LocaleEncoding::Latin1);
    let path = "/home/ren\u{e9}/r\u{e9}sum\u{e9}.txt";
    let encoded = codec.encode(path)?;
    // One byte per character in a single-byte locale.
    assert_eq!(encoded.as_bytes().len(), path.chars().count());
    assert_eq!(codec.decode(encoded.as_bytes())?, path);
    encoded.release();
    Ok(())
}

#[test]
fn latin1_rejects_unrepresentable_path() {
    let codec = PathCodec::new(LocaleEncoding::Latin1);
    let err = codec
        .encode("/tmp/\u{65e5}\u{672c}.txt")
        .expect_err("CJK path must not encode in latin-1");
    let actual = err
        .downcast_ref::<Error>()
        .expect("should downcast to syncvio::Error");
    assert!(matches!(actual, Error::Encode { encoding, .. } if encoding == "latin-1"));
}

#[test]
fn utf8_decode_rejects_invalid_bytes() {
    let codec = PathCodec::new(LocaleEncoding::Utf8);
    let err = codec
        .decode(&[0x2f, 0x74, 0xff, 0xfe])
        .expect_err("invalid utf-8 must not decode");
    let actual = err
        .downcast_ref::<Error>()
        .expect("should downcast to syncvio::Error");
    assert!(matches!(actual, Error::Decode { encoding } if encoding == "utf-8"));
}

#[test]
fn encoding_is_deterministic() -> syncvio::Result<()> {
    let codec = PathCodec::new(LocaleEncoding::Latin1);
    let a = codec.encode("/tmp/caf\u{e9}")?;
    let b = codec.encode("/tmp/caf\u{e9}")?;
    assert_eq!(a.as_bytes(), b.as_bytes());
    Ok(())
}

#[test]
fn base_name_extracts_final_component() {
    assert_eq!(base_name("/tmp/sync_test/"), "sync_test");
    assert_eq!(base_name("/tmp/sync_test/file.txt"), "file.txt");
    assert_eq!(base_name("file.txt"), "file.txt");
    assert_eq!(base_name("/"), "/");
}
