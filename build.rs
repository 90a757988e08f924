// build.rs
#[cfg(windows)]
fn main() {
    use winres::WindowsResource;

    let mut res = WindowsResource::new();
    res.set("ProductName", "DNS Proxy")
        .set("FileDescription", "DNS Proxy startup installer")
        .set("OriginalFilename", "addto-startup.exe");
    if let Err(e) = res.compile() {
        println!("cargo:warning=could not embed version resource: {e}");
    }
}

#[cfg(not(windows))]
fn main() {}
