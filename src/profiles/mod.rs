//! Built-in desktop catalog.
//!
//! Each [`Category`] is a functional role with candidates in order of
//! preference. Every candidate is tagged with its source here, at the call
//! site, so nothing in the catalog depends on name-based inference.
//!
//! | Category         | First choice        | Fallbacks |
//! |------------------|---------------------|-----------|
//! | Terminal         | alacritty           | kitty, foot, xterm |
//! | Web Browser      | firefox             | chromium, google-chrome (AUR) |
//! | Office Suite     | libreoffice-fresh   | onlyoffice-bin, wps-office (AUR) |
//! | Music Streaming  | spotify (AUR)       | spotify-launcher |

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::types::PackageSource::{self, Aur, Repo};
use crate::types::{CategoryRequest, PackageCandidate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Category {
    #[strum(serialize = "Terminal Emulator")]
    TerminalEmulator,
    #[strum(serialize = "Web Browser")]
    WebBrowser,
    #[strum(serialize = "Office Suite")]
    OfficeSuite,
    #[strum(serialize = "Code Editor")]
    CodeEditor,
    #[strum(serialize = "File Manager")]
    FileManager,
    #[strum(serialize = "Media Player")]
    MediaPlayer,
    #[strum(serialize = "PDF Viewer")]
    PdfViewer,
    #[strum(serialize = "Image Viewer")]
    ImageViewer,
    #[strum(serialize = "Archive Manager")]
    ArchiveManager,
    #[strum(serialize = "Screenshot Tool")]
    ScreenshotTool,
    #[strum(serialize = "System Monitor")]
    SystemMonitor,
    #[strum(serialize = "Fonts")]
    Fonts,
    #[strum(serialize = "Emoji Font")]
    EmojiFont,
    #[strum(serialize = "Nerd Font")]
    NerdFont,
    #[strum(serialize = "Music Streaming")]
    MusicStreaming,
}

impl Category {
    /// Candidates for this category, most preferred first.
    pub fn candidates(self) -> &'static [(&'static str, PackageSource)] {
        match self {
            Self::TerminalEmulator => &[
                ("alacritty", Repo),
                ("kitty", Repo),
                ("foot", Repo),
                ("xterm", Repo),
            ],
            Self::WebBrowser => &[
                ("firefox", Repo),
                ("chromium", Repo),
                ("google-chrome", Aur),
            ],
            Self::OfficeSuite => &[
                ("libreoffice-fresh", Repo),
                ("libreoffice-still", Repo),
                ("onlyoffice-bin", Aur),
                ("wps-office", Aur),
            ],
            Self::CodeEditor => &[
                ("code", Repo),
                ("visual-studio-code-bin", Aur),
                ("neovim", Repo),
            ],
            Self::FileManager => &[
                ("thunar", Repo),
                ("nautilus", Repo),
                ("dolphin", Repo),
                ("pcmanfm", Repo),
            ],
            Self::MediaPlayer => &[("mpv", Repo), ("vlc", Repo)],
            Self::PdfViewer => &[("zathura-pdf-mupdf", Repo), ("okular", Repo), ("evince", Repo)],
            Self::ImageViewer => &[("imv", Repo), ("eog", Repo), ("feh", Repo)],
            Self::ArchiveManager => &[("file-roller", Repo), ("ark", Repo), ("xarchiver", Repo)],
            Self::ScreenshotTool => &[("flameshot", Repo), ("spectacle", Repo), ("scrot", Repo)],
            Self::SystemMonitor => &[("btop", Repo), ("htop", Repo)],
            Self::Fonts => &[("noto-fonts", Repo), ("ttf-dejavu", Repo), ("ttf-liberation", Repo)],
            Self::EmojiFont => &[("noto-fonts-emoji", Repo), ("ttf-joypixels", Repo)],
            Self::NerdFont => &[
                ("ttf-jetbrains-mono-nerd", Repo),
                ("ttf-firacode-nerd", Repo),
                ("nerd-fonts-git", Aur),
            ],
            Self::MusicStreaming => &[("spotify", Aur), ("spotify-launcher", Repo)],
        }
    }

    pub fn request(self) -> CategoryRequest {
        CategoryRequest::new(
            self.to_string(),
            self.candidates()
                .iter()
                .map(|&(name, source)| PackageCandidate::new(name, source))
                .collect(),
        )
    }
}

/// Every built-in category, in catalog order.
pub fn default_requests() -> Vec<CategoryRequest> {
    Category::iter().map(Category::request).collect()
}
