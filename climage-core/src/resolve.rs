use std::num::NonZeroUsize;
use std::sync::{LazyLock, Mutex, OnceLock};

use lru::LruCache;

use crate::color::{ColorDepth, Resolved, Rgb};
use crate::error::Result;
use crate::kdtree::NearestColorIndex;
use crate::palette::{extended_entries, PaletteName};

const MEMO_CAPACITY: usize = 256;

/// One index slot per (palette depth, palette), filled on first use.
const SLOTS: usize = 3 * PaletteName::COUNT;
static INDEXES: [OnceLock<NearestColorIndex>; SLOTS] = [const { OnceLock::new() }; SLOTS];

type MemoKey = (ColorDepth, PaletteName, Rgb);

static MEMO: LazyLock<Mutex<LruCache<MemoKey, u8>>> =
    LazyLock::new(|| Mutex::new(LruCache::new(NonZeroUsize::new(MEMO_CAPACITY).expect("non-zero"))));

/// Maps pixels to what the chosen color depth can show.
///
/// Palette depths share process-wide nearest-color indexes, one per (depth, palette),
/// plus a small LRU of recent answers since neighbouring pixels tend to repeat.
#[derive(Debug, Clone, Copy)]
pub struct ColorResolver {
    depth: ColorDepth,
    palette: PaletteName,
    index: Option<&'static NearestColorIndex>,
}

impl ColorResolver {
    pub fn new(depth: ColorDepth, palette: PaletteName) -> Self {
        Self {
            depth,
            palette,
            index: index_for(depth, palette),
        }
    }

    /// Build from string values. The palette is not looked at for truecolor.
    pub fn from_names(depth: &str, palette: &str) -> Result<Self> {
        let depth: ColorDepth = depth.parse()?;
        let palette = match depth {
            ColorDepth::TrueColor => PaletteName::default(),
            _ => palette.parse()?,
        };
        Ok(Self::new(depth, palette))
    }

    pub fn depth(&self) -> ColorDepth {
        self.depth
    }

    pub fn palette(&self) -> PaletteName {
        self.palette
    }

    pub fn resolve(&self, color: Rgb) -> Resolved {
        let Some(index) = self.index else {
            return Resolved::Rgb(color);
        };

        let key = (self.depth, self.palette, color);
        if let Ok(mut memo) = MEMO.lock() {
            if let Some(code) = memo.get(&key) {
                return Resolved::Code(*code);
            }
        }

        let code = index.nearest(color).code;

        if let Ok(mut memo) = MEMO.lock() {
            memo.put(key, code);
        }

        Resolved::Code(code)
    }
}

/// Resolve a single color without keeping a resolver around.
pub fn resolve(color: Rgb, depth: ColorDepth, palette: PaletteName) -> Resolved {
    ColorResolver::new(depth, palette).resolve(color)
}

/// Resolve a single color from string depth and palette values.
pub fn resolve_named(color: Rgb, depth: &str, palette: &str) -> Result<Resolved> {
    Ok(ColorResolver::from_names(depth, palette)?.resolve(color))
}

/// The shared index for a palette depth, built on first request. `None` for truecolor.
pub fn index_for(depth: ColorDepth, palette: PaletteName) -> Option<&'static NearestColorIndex> {
    let row = match depth {
        ColorDepth::TrueColor => return None,
        ColorDepth::Color256 => 0,
        ColorDepth::Color16 => 1,
        ColorDepth::Color8 => 2,
    };

    let slot = &INDEXES[row * PaletteName::COUNT + palette.index()];
    Some(slot.get_or_init(|| {
        let system = palette.palette();
        let index = match depth {
            ColorDepth::Color256 => {
                let mut candidates = system.system().to_vec();
                candidates.extend_from_slice(extended_entries());
                NearestColorIndex::build(&candidates)
            }
            ColorDepth::Color16 => NearestColorIndex::build(system.system()),
            _ => NearestColorIndex::build(system.dark()),
        };
        tracing::debug!(%depth, %palette, candidates = index.len(), "built color index");
        index
    }))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::error::Error;
    use crate::palette::PaletteEntry;

    fn candidates(depth: ColorDepth, palette: PaletteName) -> Vec<PaletteEntry> {
        let system = palette.palette();
        match depth {
            ColorDepth::Color256 => system.system().iter().chain(extended_entries()).copied().collect(),
            ColorDepth::Color16 => system.system().to_vec(),
            ColorDepth::Color8 => system.dark().to_vec(),
            ColorDepth::TrueColor => Vec::new(),
        }
    }

    #[test]
    fn truecolor_is_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        for palette in PaletteName::ALL {
            for _ in 0..50 {
                let color = Rgb::new(rng.random(), rng.random(), rng.random());
                assert_eq!(resolve(color, ColorDepth::TrueColor, palette), Resolved::Rgb(color));
            }
        }
    }

    #[test]
    fn truecolor_ignores_palette_name() {
        let resolver = ColorResolver::from_names("truecolor", "no-such-palette").unwrap();
        assert_eq!(resolver.resolve(Rgb::new(1, 2, 3)), Resolved::Rgb(Rgb::new(1, 2, 3)));
    }

    #[test]
    fn named_resolve() {
        assert_eq!(
            resolve_named(Rgb::new(250, 5, 5), "16color", "default").unwrap(),
            Resolved::Code(9)
        );
        assert_eq!(
            resolve_named(Rgb::new(250, 5, 5), "8color", "default").unwrap(),
            Resolved::Code(1)
        );
    }

    #[test]
    fn named_lookups_validate() {
        assert_eq!(
            ColorResolver::from_names("16color", "no-such-palette").unwrap_err(),
            Error::UnknownPalette("no-such-palette".to_string())
        );
        assert!(matches!(
            ColorResolver::from_names("12color", "default"),
            Err(Error::InvalidDepth(_))
        ));
    }

    #[test]
    fn known_sixteen_and_eight_color_answers() {
        let p = PaletteName::Default;
        assert_eq!(resolve(Rgb::new(0, 0, 0), ColorDepth::Color16, p), Resolved::Code(0));
        assert_eq!(resolve(Rgb::new(255, 255, 255), ColorDepth::Color16, p), Resolved::Code(15));
        assert_eq!(resolve(Rgb::new(128, 128, 128), ColorDepth::Color16, p), Resolved::Code(8));
        // Code 8 is not in the dark set; (128, 128, 0) is the first at distance 128.
        assert_eq!(resolve(Rgb::new(128, 128, 128), ColorDepth::Color8, p), Resolved::Code(3));
    }

    #[test]
    fn system_colors_win_over_identical_cube_colors() {
        let p = PaletteName::Default;
        assert_eq!(resolve(Rgb::new(0, 0, 0), ColorDepth::Color256, p), Resolved::Code(0));
        assert_eq!(resolve(Rgb::new(255, 255, 255), ColorDepth::Color256, p), Resolved::Code(15));
        assert_eq!(resolve(Rgb::new(95, 135, 175), ColorDepth::Color256, p), Resolved::Code(67));
        assert_eq!(resolve(Rgb::new(118, 118, 118), ColorDepth::Color256, p), Resolved::Code(243));
    }

    #[test]
    fn results_are_nearest_by_brute_force() {
        let mut rng = StdRng::seed_from_u64(42);
        for depth in [ColorDepth::Color256, ColorDepth::Color16, ColorDepth::Color8] {
            for palette in PaletteName::ALL {
                let set = candidates(depth, palette);
                for _ in 0..200 {
                    let color = Rgb::new(rng.random(), rng.random(), rng.random());
                    let Resolved::Code(code) = resolve(color, depth, palette) else {
                        panic!("palette depth returned rgb");
                    };
                    let chosen = set.iter().find(|e| e.code == code).expect("code in candidate set");
                    let best = set.iter().map(|e| color.manhattan(&e.color)).min().unwrap();
                    assert_eq!(color.manhattan(&chosen.color), best, "{depth} {palette} {color:?}");
                }
            }
        }
    }

    #[test]
    fn repeated_calls_agree() {
        let mut rng = StdRng::seed_from_u64(7);
        let resolver = ColorResolver::new(ColorDepth::Color256, PaletteName::Solarized);
        // More distinct colors than the memo holds, so some answers come back evicted.
        let colors: Vec<Rgb> = (0..MEMO_CAPACITY * 2)
            .map(|_| Rgb::new(rng.random(), rng.random(), rng.random()))
            .collect();
        let first: Vec<Resolved> = colors.iter().map(|c| resolver.resolve(*c)).collect();
        let second: Vec<Resolved> = colors.iter().map(|c| resolver.resolve(*c)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn one_index_per_key() {
        let a = index_for(ColorDepth::Color16, PaletteName::Tango).unwrap();
        let b = index_for(ColorDepth::Color16, PaletteName::Tango).unwrap();
        assert!(std::ptr::eq(a, b));

        let c = index_for(ColorDepth::Color8, PaletteName::Tango).unwrap();
        assert!(!std::ptr::eq(a, c));
        assert_eq!(c.len(), 8);
        assert_eq!(index_for(ColorDepth::Color256, PaletteName::Tango).unwrap().len(), 256);
        assert!(index_for(ColorDepth::TrueColor, PaletteName::Tango).is_none());
    }

    #[test]
    fn concurrent_first_use_builds_once() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    index_for(ColorDepth::Color16, PaletteName::GruvboxDark).unwrap() as *const NearestColorIndex as usize
                })
            })
            .collect();
        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    }
}
