// THEORY:
// A `Mask` is the binary output of thresholding: one flag per source pixel, laid out
// row-major with the same geometry as the frame it came from. It is a "dumb" data
// container consumed immediately by the blob detector.

pub mod mask {
    /// A 2D binary grid matching its source frame's dimensions.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Mask {
        width: u32,
        height: u32,
        bits: Vec<bool>,
    }

    impl Mask {
        /// An all-unset mask.
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                bits: vec![false; width as usize * height as usize],
            }
        }

        /// Builds a mask from row-major flags. Returns `None` if the length is wrong.
        pub fn from_bits(width: u32, height: u32, bits: Vec<bool>) -> Option<Self> {
            (bits.len() == width as usize * height as usize).then_some(Self { width, height, bits })
        }

        /// Builds a mask from rows of `'#'` (set) and anything else (unset).
        /// Rows must share one length.
        pub fn from_rows(rows: &[&str]) -> Option<Self> {
            let height = rows.len() as u32;
            let width = rows.first().map_or(0, |row| row.chars().count()) as u32;
            let mut bits = Vec::with_capacity(width as usize * height as usize);
            for row in rows {
                if row.chars().count() as u32 != width {
                    return None;
                }
                bits.extend(row.chars().map(|c| c == '#'));
            }
            Self::from_bits(width, height, bits)
        }

        pub fn width(&self) -> u32 {
            self.width
        }

        pub fn height(&self) -> u32 {
            self.height
        }

        #[inline]
        pub fn get(&self, x: u32, y: u32) -> bool {
            x < self.width && y < self.height && self.bits[self.index(x, y)]
        }

        #[inline]
        pub fn set(&mut self, x: u32, y: u32, value: bool) {
            if x < self.width && y < self.height {
                let index = self.index(x, y);
                self.bits[index] = value;
            }
        }

        /// Number of set pixels.
        pub fn count_set(&self) -> usize {
            self.bits.iter().filter(|bit| **bit).count()
        }

        pub fn is_blank(&self) -> bool {
            !self.bits.iter().any(|bit| *bit)
        }

        pub fn as_slice(&self) -> &[bool] {
            &self.bits
        }

        /// Mask rendered as 0/255 grey bytes, row-major.
        pub fn to_luma_bytes(&self) -> Vec<u8> {
            self.bits.iter().map(|bit| if *bit { 255 } else { 0 }).collect()
        }

        #[inline]
        fn index(&self, x: u32, y: u32) -> usize {
            y as usize * self.width as usize + x as usize
        }
    }
}
