use std::io::Read;

// Generated by build.rs, declares `Assets`.
include!(concat!(env!("OUT_DIR"), "/assets.rs"));

mod packed {
    include_static_macros::include_dir!("assets", base64);
}

fn main() {
    let original_content = "Contents of file.txt\n";

    Assets::init();

    let mut s = String::new();
    Assets::get("file.txt")
        .expect("file.txt is bundled")
        .read_to_string(&mut s)
        .expect("data is not valid UTF-8");
    println!("{s}");
    assert_eq!(s, original_content);

    let listed = Assets::list();
    let paths: Vec<&str> = listed.keys().copied().collect();
    println!("{}", paths.join(", "));
    assert_eq!(paths, ["empty.txt", "file.txt", "nested/hello.txt"]);
    assert!(Assets::get("missing.txt").is_none());
    assert_eq!(listed["empty.txt"].get_ref().len(), 0);

    // The macro-generated bundle holds the same files.
    packed::Assets::try_init().expect("macro bundle decodes");
    for (path, reader) in Assets::list() {
        let macro_reader = packed::Assets::get(path).expect("path present in both bundles");
        assert_eq!(reader.get_ref(), macro_reader.get_ref());
    }
    assert_eq!(packed::Assets::assets().encoding(), include_static::Encoding::Base64);

    println!("Decoded data matches original.");
}
