//! Physical page sequence and physical ↔ logical index mapping.
//!
//! The flip widget renders *physical* pages in two-page spreads, so the book
//! handed to it must have an even number of slots. The reader, on the other
//! hand, thinks in *logical* pages: the real pages of the scanned document.
//!
//! ```text
//! physical:  0       1             2        3       ...  N      (N+1)
//!            Cover   FillerFront   Real2    Real3   ...  RealN  FillerBack?
//! logical:   0       0             1        2       ...  N-1
//! ```

/// Caption kind of a synthetic filler page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillerKind {
    /// Inside-cover page shown after the cover.
    Front,
    /// Inside-back page appended only to balance page parity.
    Back,
}

/// One slot in the rendered flip sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhysicalPage {
    /// First real page, rendered as the cover.
    Cover {
        /// Image URL of the first manifest page.
        url: String,
    },
    /// Synthetic logo page following the cover.
    FillerFront,
    /// A real document page after the cover.
    RealPage {
        /// 0-based logical index of this page.
        logical: usize,
        /// Image URL of the manifest page.
        url: String,
    },
    /// Synthetic logo page padding the end of the book.
    FillerBack,
}

impl PhysicalPage {
    /// Image URL for cover and real pages, `None` for fillers.
    pub fn image_url(&self) -> Option<&str> {
        match self {
            PhysicalPage::Cover { url } | PhysicalPage::RealPage { url, .. } => Some(url),
            PhysicalPage::FillerFront | PhysicalPage::FillerBack => None,
        }
    }

    /// Filler kind for synthetic pages, `None` for image pages.
    pub fn filler_kind(&self) -> Option<FillerKind> {
        match self {
            PhysicalPage::FillerFront => Some(FillerKind::Front),
            PhysicalPage::FillerBack => Some(FillerKind::Back),
            _ => None,
        }
    }
}

/// A physical page together with its rendering hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlot<'a> {
    /// 0-based physical index.
    pub index: usize,
    /// The page itself.
    pub page: &'a PhysicalPage,
    /// Whether the page image should load eagerly.
    pub eager: bool,
}

impl PageSlot<'_> {
    /// Accessible text for the page image (`"Page 1"`, `"Page 2"`, ...).
    pub fn alt_text(&self) -> String {
        format!("Page {}", self.index + 1)
    }
}

/// Ordered physical pages built once from the manifest page list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSequence {
    pages: Vec<PhysicalPage>,
    logical_count: usize,
    has_back_filler: bool,
}

impl PageSequence {
    /// Build the sequence `[Cover, FillerFront, Real(1..N-1), FillerBack?]`.
    ///
    /// `FillerBack` is appended exactly when the preceding count is odd, so
    /// the result always has even length. An empty page list yields an empty
    /// sequence.
    pub fn build(urls: &[String]) -> Self {
        let Some((cover, rest)) = urls.split_first() else {
            return Self {
                pages: Vec::new(),
                logical_count: 0,
                has_back_filler: false,
            };
        };

        let mut pages = Vec::with_capacity(urls.len() + 2);
        pages.push(PhysicalPage::Cover { url: cover.clone() });
        pages.push(PhysicalPage::FillerFront);
        pages.extend(rest.iter().enumerate().map(|(i, url)| PhysicalPage::RealPage {
            logical: i + 1,
            url: url.clone(),
        }));

        let has_back_filler = pages.len() % 2 == 1;
        if has_back_filler {
            pages.push(PhysicalPage::FillerBack);
        }

        Self {
            pages,
            logical_count: urls.len(),
            has_back_filler,
        }
    }

    /// Physical pages in order.
    pub fn pages(&self) -> &[PhysicalPage] {
        &self.pages
    }

    /// Number of physical slots.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the sequence holds no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Whether a back filler was appended.
    pub fn has_back_filler(&self) -> bool {
        self.has_back_filler
    }

    /// Pages with rendering hints; the first `eager_pages` slots load eagerly.
    pub fn slots(&self, eager_pages: usize) -> impl Iterator<Item = PageSlot<'_>> {
        self.pages.iter().enumerate().map(move |(index, page)| PageSlot {
            index,
            page,
            eager: index < eager_pages,
        })
    }

    /// Index mapper derived from this sequence.
    pub fn page_map(&self) -> PageMap {
        PageMap::new(self.logical_count, self.pages.len(), self.has_back_filler)
    }
}

/// Physical ↔ logical conversion and navigation boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMap {
    logical_count: usize,
    physical_count: usize,
    last_real_physical_idx: usize,
}

impl PageMap {
    /// Derive the mapper constants from the sequence shape.
    pub fn new(logical_count: usize, physical_count: usize, has_back_filler: bool) -> Self {
        let last_real_physical_idx = physical_count
            .saturating_sub(1)
            .saturating_sub(usize::from(has_back_filler));
        Self {
            logical_count,
            physical_count,
            last_real_physical_idx,
        }
    }

    /// Number of real document pages.
    pub fn logical_count(&self) -> usize {
        self.logical_count
    }

    /// Number of physical slots, fillers included.
    pub fn physical_count(&self) -> usize {
        self.physical_count
    }

    /// Last physical index that holds real content.
    pub fn last_real_physical_idx(&self) -> usize {
        self.last_real_physical_idx
    }

    /// Logical page shown at a physical index. Cover and front filler both map to 0.
    pub fn logical_from_physical(&self, physical: usize) -> usize {
        if physical <= 1 {
            return 0;
        }
        (physical - 1).min(self.logical_count.saturating_sub(1))
    }

    /// "Next" is allowed strictly before the last real page.
    pub fn can_flip_next(&self, physical: usize) -> bool {
        physical < self.last_real_physical_idx
    }

    /// "Previous" is allowed anywhere after the cover.
    pub fn can_flip_prev(&self, physical: usize) -> bool {
        physical > 0
    }

    /// Where to force navigation when the widget has landed on the back filler.
    pub fn landing_correction(&self, physical: usize) -> Option<usize> {
        (physical > self.last_real_physical_idx).then_some(self.last_real_physical_idx)
    }

    /// Logical pages worth warming around `logical`: itself, the next two and
    /// the previous one, skipping anything out of range.
    pub fn warm_targets(&self, logical: usize) -> Vec<usize> {
        [
            Some(logical),
            logical.checked_add(1),
            logical.checked_add(2),
            logical.checked_sub(1),
        ]
        .into_iter()
        .flatten()
        .filter(|&li| li < self.logical_count)
        .collect()
    }
}
