// THEORY:
// The `BlobDetector` is the spatial grouping stage. It takes a binary mask and finds
// the maximal connected regions of set pixels, then picks the one that represents
// the marker.
//
// Algorithm:
// 1.  **Row-major scan**: pixels are visited top-left to bottom-right. The first
//     unvisited set pixel met seeds a new region, so region ids follow scan order.
// 2.  **Region growing**: from each seed an iterative flood fill claims every set
//     pixel reachable through the 8 surrounding neighbours (8-connectivity, which
//     matches how external contours treat diagonal contact).
// 3.  **Aggregation**: each region records its bounding box and pixel area.
// 4.  **Selection**: `localize` keeps the region with the largest area. On a tie the
//     earlier region in scan order wins, which keeps selection reproducible.
// 5.  **Stateless utility**: nothing survives between calls.

use crate::core_modules::mask::mask::Mask;
use crate::core_modules::smart_blob::{BoundingBox, Centroid, Point, SmartBlob};

pub mod blob_detector {
    use super::*;

    /// The 8 neighbours of a pixel, as (dx, dy) offsets.
    const NEIGHBOURS: [(i64, i64); 8] = [
        (-1, -1),
        (0, -1),
        (1, -1),
        (-1, 0),
        (1, 0),
        (-1, 1),
        (0, 1),
        (1, 1),
    ];

    /// Finds every connected region in `mask`, ordered by scan order of their first pixel.
    pub fn find_blobs(mask: &Mask) -> Vec<SmartBlob> {
        let (width, height) = (mask.width(), mask.height());
        let mut visited = vec![false; width as usize * height as usize];
        let mut blobs: Vec<SmartBlob> = Vec::new();
        let mut blob_id_counter = 0;

        for y in 0..height {
            for x in 0..width {
                let index = y as usize * width as usize + x as usize;
                if visited[index] || !mask.get(x, y) {
                    continue;
                }
                let blob = grow_blob_from_seed(Point { x, y }, mask, &mut visited, blob_id_counter);
                blobs.push(blob);
                blob_id_counter += 1;
            }
        }

        blobs
    }

    /// Returns the largest region in `mask` that is at least `min_area` pixels,
    /// first-in-scan-order on ties.
    pub fn largest_blob(mask: &Mask, min_area: usize) -> Option<SmartBlob> {
        let mut best: Option<SmartBlob> = None;
        for blob in find_blobs(mask) {
            if blob.area < min_area {
                continue;
            }
            // Strictly greater keeps the earliest region on ties.
            if best.as_ref().is_none_or(|current| blob.area > current.area) {
                best = Some(blob);
            }
        }
        best
    }

    /// Centroid of the largest region in `mask`, or `None` if the mask has no set pixels.
    pub fn localize(mask: &Mask) -> Option<Centroid> {
        localize_with_min_area(mask, 1)
    }

    /// Like [`localize`], ignoring regions smaller than `min_area` pixels.
    pub fn localize_with_min_area(mask: &Mask, min_area: usize) -> Option<Centroid> {
        largest_blob(mask, min_area).map(|blob| blob.centroid())
    }

    /// Flood fills one region starting at `seed` and aggregates its properties.
    fn grow_blob_from_seed(seed: Point, mask: &Mask, visited: &mut [bool], blob_id: u64) -> SmartBlob {
        let width = mask.width() as i64;
        let height = mask.height() as i64;
        let mut queue: Vec<Point> = vec![seed];
        visited[(seed.y as i64 * width + seed.x as i64) as usize] = true;

        let mut min = seed;
        let mut max = seed;
        let mut area = 0usize;

        while let Some(current) = queue.pop() {
            area += 1;
            min.x = min.x.min(current.x);
            min.y = min.y.min(current.y);
            max.x = max.x.max(current.x);
            max.y = max.y.max(current.y);

            for (dx, dy) in NEIGHBOURS {
                let nx = current.x as i64 + dx;
                let ny = current.y as i64 + dy;
                if nx < 0 || nx >= width || ny < 0 || ny >= height {
                    continue;
                }
                let index = (ny * width + nx) as usize;
                if !visited[index] && mask.get(nx as u32, ny as u32) {
                    visited[index] = true;
                    queue.push(Point {
                        x: nx as u32,
                        y: ny as u32,
                    });
                }
            }
        }

        SmartBlob {
            id: blob_id,
            bounding_box: BoundingBox { min, max },
            area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::blob_detector::*;
    use super::*;

    fn mask(rows: &[&str]) -> Mask {
        Mask::from_rows(rows).expect("rectangular test mask")
    }

    #[test]
    fn blank_mask_has_no_centroid() {
        assert_eq!(localize(&Mask::new(8, 8)), None);
        assert_eq!(localize(&Mask::new(0, 0)), None);
        assert!(find_blobs(&Mask::new(3, 3)).is_empty());
    }

    #[test]
    fn single_region_centroid_is_box_midpoint_not_area_centroid() {
        // An L shape: area centroid would be pulled toward the long arm.
        let m = mask(&[
            "......",
            ".#....",
            ".#....",
            ".#....",
            ".####.",
        ]);
        // x 1..=4 (w=4), y 1..=4 (h=4) -> (1 + 2, 1 + 2)
        assert_eq!(localize(&m), Some(Point::new(3, 3)));
    }

    #[test]
    fn shape_inside_same_box_gives_same_centroid() {
        let filled = mask(&["###", "###", "###"]);
        let ring = mask(&["###", "#.#", "###"]);
        let cross = mask(&[".#.", "###", ".#."]);
        assert_eq!(localize(&filled), Some(Point::new(1, 1)));
        assert_eq!(localize(&ring), localize(&filled));
        assert_eq!(localize(&cross), localize(&filled));
    }

    #[test]
    fn diagonal_contact_joins_regions() {
        let m = mask(&["#..", ".#.", "..#"]);
        let blobs = find_blobs(&m);
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].area, 3);
    }

    #[test]
    fn largest_region_wins() {
        let m = mask(&[
            "##.....",
            "##.....",
            "....###",
            "....###",
        ]);
        let blobs = find_blobs(&m);
        assert_eq!(blobs.len(), 2);
        assert_eq!(blobs[0].area, 4);
        assert_eq!(blobs[1].area, 6);
        assert_eq!(localize(&m), Some(Point::new(5, 3)));
    }

    #[test]
    fn ties_go_to_first_region_in_scan_order() {
        let m = mask(&[
            "....##",
            "......",
            "##....",
        ]);
        // Top-right pair is met first during the row-major scan.
        assert_eq!(localize(&m), Some(Point::new(5, 0)));
        let blobs = find_blobs(&m);
        assert_eq!(blobs[0].id, 0);
        assert_eq!(blobs[0].bounding_box.min, Point::new(4, 0));
    }

    #[test]
    fn min_area_filters_specks() {
        let m = mask(&["#....", ".....", "...##"]);
        assert_eq!(localize_with_min_area(&m, 2), Some(Point::new(4, 2)));
        assert_eq!(localize_with_min_area(&m, 3), None);
    }

    #[test]
    fn concave_region_is_one_blob() {
        let m = mask(&[
            "#...#",
            "#...#",
            "#####",
        ]);
        let blobs = find_blobs(&m);
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].area, 9);
        assert_eq!(blobs[0].centroid(), Point::new(2, 1));
    }
}
