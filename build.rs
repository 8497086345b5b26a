#[cfg(target_os = "windows")]
fn main() {
    use winresource::WindowsResource;

    let mut res = WindowsResource::new();
    if std::path::Path::new("res/pomodoro-pet.ico").exists() {
        res.set_icon("res/pomodoro-pet.ico");
    }
    res.set("FileDescription", "Pomodoro Pet desk timer")
        .set("ProductName", "Pomodoro Pet")
        .set("OriginalFilename", "pomodoro-pet.exe")
        .set("FileVersion", env!("CARGO_PKG_VERSION"))
        .set("ProductVersion", env!("CARGO_PKG_VERSION"))
        .compile()
        .expect("Failed to embed version resource");
}

#[cfg(not(target_os = "windows"))]
fn main() {}
