fn main() {
    include_static::Config::new("assets")
        .level(9)
        .build()
        .expect("Failed to bundle assets");
}
