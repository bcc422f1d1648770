fn main() {
  cfg_aliases::cfg_aliases! {
      linux: { target_os = "linux" },
      bsdish: { any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "dragonfly"
      ) }
  }
}
