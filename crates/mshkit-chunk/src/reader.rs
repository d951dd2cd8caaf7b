//! Recursive chunk reader.
//!
//! A chunk is an 8-byte [`ChunkHeader`] followed by `length` payload bytes.
//! Container payloads are a back-to-back run of complete child chunks; leaf
//! payloads are opaque. Every read is checked against the end of the
//! enclosing payload, so a child can never claim bytes that belong to its
//! parent's siblings.

use mshkit_common::BinaryReader;
use tracing::{debug, trace};

use crate::classify::child_prefix_len;
use crate::{Body, ChildMap, Chunk, ChunkHeader, ChunkKind, Error, Result, Tag};

/// Default nesting limit. Real files nest a handful of levels deep.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Deepest level whose ordered siblings are decoded on the rayon pool.
/// Everything below is read sequentially on the worker that owns the subtree,
/// so nested fan-out never stacks pool frames on top of deep recursion.
pub const PARALLEL_MAX_DEPTH: usize = 2;

/// Options controlling how a chunk tree is read.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Deepest nesting level accepted below the starting chunk.
    pub max_depth: usize,
    /// Decode ordered siblings near the root in parallel. Only has an effect
    /// when the `parallel` feature is enabled.
    pub parallel: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            parallel: true,
        }
    }
}

/// Parse the single top-level chunk at the start of `buffer`.
///
/// Bytes after the end of that chunk are ignored.
///
/// # Example
///
/// ```
/// let mut data = b"TEST".to_vec();
/// data.extend_from_slice(&4u32.to_le_bytes());
/// data.extend_from_slice(b"abcd");
///
/// let root = mshkit_chunk::parse_root(&data)?;
/// assert_eq!(root.tag(), "TEST");
/// assert_eq!(root.payload(), Some(&b"abcd"[..]));
/// # Ok::<(), mshkit_chunk::Error>(())
/// ```
pub fn parse_root(buffer: &[u8]) -> Result<Chunk<'_>> {
    parse(buffer, 0)
}

/// Parse the chunk starting at `offset`, bounded by the end of `buffer`.
pub fn parse(buffer: &[u8], offset: usize) -> Result<Chunk<'_>> {
    parse_with(buffer, offset, &ParseOptions::default())
}

/// Parse the chunk starting at `offset` with explicit options.
pub fn parse_with<'a>(buffer: &'a [u8], offset: usize, options: &ParseOptions) -> Result<Chunk<'a>> {
    ChunkReader { buffer, options }.read(offset, buffer.len(), 0)
}

/// Decode the header at `offset`, reading no further than `bound`.
///
/// Returns the header and the absolute offset where its payload starts.
pub fn read_header(buffer: &[u8], offset: usize, bound: usize) -> Result<(ChunkHeader, usize)> {
    let mut reader = BinaryReader::bounded(buffer, offset, bound);
    if reader.remaining() < ChunkHeader::SIZE {
        return Err(Error::TruncatedHeader {
            offset,
            available: reader.remaining(),
        });
    }
    let header: ChunkHeader = reader.read_struct()?;
    Ok((header, reader.position()))
}

struct ChunkReader<'a, 'o> {
    buffer: &'a [u8],
    options: &'o ParseOptions,
}

impl<'a> ChunkReader<'a, '_> {
    /// Read one chunk whose bytes must end at or before `bound`.
    fn read(&self, offset: usize, bound: usize, depth: usize) -> Result<Chunk<'a>> {
        if depth > self.options.max_depth {
            return Err(Error::DepthExceeded {
                depth: self.options.max_depth,
            });
        }

        let (header, payload_start) = read_header(self.buffer, offset, bound)?;
        let tag = header.tag;
        let length = header.length.get();
        let payload_end = payload_start.saturating_add(length as usize);

        if payload_end > bound {
            return Err(Error::BoundsError {
                tag,
                offset,
                end: payload_end,
                bound,
            });
        }

        trace!(%tag, offset, length, depth, "chunk");

        let body = match ChunkKind::of(tag) {
            ChunkKind::Leaf => Body::Leaf(&self.buffer[payload_start..payload_end]),
            ChunkKind::Unique => {
                let mut map = ChildMap::new();
                for child_offset in self.child_offsets(tag, offset, payload_start, payload_end)? {
                    let child = self.read(child_offset, payload_end, depth + 1)?;
                    if let Some(replaced) = map.insert(child) {
                        debug!(parent = %tag, child = %replaced.tag(), "duplicate child replaced");
                    }
                }
                debug!(%tag, children = map.len(), "unique container");
                Body::Unique(map)
            }
            ChunkKind::Ordered => {
                let offsets = self.child_offsets(tag, offset, payload_start, payload_end)?;
                let children = self.read_ordered(&offsets, payload_end, depth + 1)?;
                debug!(%tag, children = children.len(), "ordered container");
                Body::Ordered(children)
            }
        };

        Ok(Chunk::new(tag, length, body))
    }

    /// Frame the children of a container payload without decoding them.
    ///
    /// Each header is checked against `payload_end`, so the returned offsets
    /// exactly tile the payload.
    fn child_offsets(
        &self,
        tag: Tag,
        offset: usize,
        payload_start: usize,
        payload_end: usize,
    ) -> Result<Vec<usize>> {
        let mut reader = BinaryReader::bounded(self.buffer, payload_start, payload_end);

        let prefix = child_prefix_len(tag);
        if prefix > 0 {
            if reader.remaining() < prefix {
                return Err(Error::BoundsError {
                    tag,
                    offset,
                    end: payload_start + prefix,
                    bound: payload_end,
                });
            }
            let count = reader.read_u32()?;
            trace!(%tag, count, "skipped count prefix");
        }

        let mut offsets = Vec::new();
        while !reader.is_empty() {
            let child_offset = reader.position();
            let (header, child_payload) = read_header(self.buffer, child_offset, payload_end)?;
            let child_end = child_payload.saturating_add(header.length.get() as usize);
            if child_end > payload_end {
                return Err(Error::BoundsError {
                    tag: header.tag,
                    offset: child_offset,
                    end: child_end,
                    bound: payload_end,
                });
            }
            offsets.push(child_offset);
            reader.seek(child_end);
        }

        Ok(offsets)
    }

    fn read_ordered(&self, offsets: &[usize], bound: usize, depth: usize) -> Result<Vec<Chunk<'a>>> {
        #[cfg(feature = "parallel")]
        {
            if self.options.parallel && depth <= PARALLEL_MAX_DEPTH && offsets.len() > 1 {
                use rayon::prelude::*;

                return offsets
                    .par_iter()
                    .map(|&child_offset| self.read(child_offset, bound, depth))
                    .collect();
            }
        }

        offsets
            .iter()
            .map(|&child_offset| self.read(child_offset, bound, depth))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{chunk, chunk_with_length, matl};

    #[test]
    fn test_leaf_root() {
        let data = chunk(b"TEST", b"abcd");
        let root = parse_root(&data).unwrap();

        assert_eq!(root.tag(), "TEST");
        assert_eq!(root.length(), 4);
        assert_eq!(root.body(), &Body::Leaf(b"abcd"));
    }

    #[test]
    fn test_empty_leaf() {
        let data = chunk(b"NULL", b"");
        let root = parse_root(&data).unwrap();
        assert_eq!(root.payload(), Some(&b""[..]));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut data = chunk(b"TEST", b"abcd");
        data.extend_from_slice(b"garbage that is not a chunk");
        let root = parse_root(&data).unwrap();
        assert_eq!(root.payload(), Some(&b"abcd"[..]));
    }

    #[test]
    fn test_parse_at_offset() {
        let mut data = b"PAD!".to_vec();
        data.extend(chunk(b"NAME", b"x\0"));
        let chunk = parse(&data, 4).unwrap();
        assert_eq!(chunk.tag(), "NAME");
    }

    #[test]
    fn test_unique_container() {
        let mut payload = chunk(b"NAME", b"Foo\0");
        payload.extend(chunk(b"MTYP", &7u32.to_le_bytes()));
        let data = chunk(b"MATD", &payload);

        let root = parse_root(&data).unwrap();
        assert_eq!(root.kind(), ChunkKind::Unique);
        assert_eq!(root.child_count(), 2);
        assert_eq!(root.get(b"NAME").unwrap().payload(), Some(&b"Foo\0"[..]));
        assert_eq!(root.get(b"MTYP").unwrap().scalar_count().unwrap(), 7);
    }

    #[test]
    fn test_ordered_container_keeps_duplicates() {
        let mut payload = Vec::new();
        for i in 0..3u32 {
            payload.extend(chunk(b"GEOM", &chunk(b"MATI", &i.to_le_bytes())));
        }
        let data = chunk(b"MSH2", &payload);

        let root = parse_root(&data).unwrap();
        assert_eq!(root.kind(), ChunkKind::Ordered);
        assert_eq!(root.child_count(), 3);

        let indices: Vec<u32> = root
            .children()
            .map(|geom| geom.filter(b"MATI")[0].scalar_count().unwrap())
            .collect();
        assert_eq!(indices, [0, 1, 2]);
    }

    #[test]
    fn test_unique_last_write_wins() {
        let mut payload = chunk(b"FLGS", &1u32.to_le_bytes());
        payload.extend(chunk(b"NAME", b"a\0"));
        payload.extend(chunk(b"FLGS", &2u32.to_le_bytes()));
        let data = chunk(b"MODL", &payload);

        let root = parse_root(&data).unwrap();
        assert_eq!(root.child_count(), 2);
        assert_eq!(root.get(b"FLGS").unwrap().scalar_count().unwrap(), 2);

        // The surviving child keeps the position of the first occurrence.
        let tags: Vec<String> = root.children().map(|c| c.tag().to_string()).collect();
        assert_eq!(tags, ["FLGS", "NAME"]);
    }

    #[test]
    fn test_matl_skips_count_prefix() {
        let data = matl(&[chunk(b"MATD", &chunk(b"NAME", b"a\0")), chunk(b"MATD", &chunk(b"NAME", b"b\0"))]);

        let root = parse_root(&data).unwrap();
        assert_eq!(root.kind(), ChunkKind::Ordered);
        assert_eq!(root.child_count(), 2);
        assert!(root.children().all(|c| c.tag() == "MATD"));

        let tiled: usize = root.children().map(|c| c.span_len()).sum();
        assert_eq!(tiled + 4, root.length() as usize);
    }

    #[test]
    fn test_matl_too_short_for_prefix() {
        let data = chunk(b"MATL", &[1, 0]);
        assert!(matches!(parse_root(&data), Err(Error::BoundsError { .. })));
    }

    #[test]
    fn test_empty_matl() {
        let data = matl(&[]);
        let root = parse_root(&data).unwrap();
        assert_eq!(root.child_count(), 0);
    }

    #[test]
    fn test_truncated_header() {
        let data = b"TES";
        match parse_root(data) {
            Err(Error::TruncatedHeader { offset, available }) => {
                assert_eq!(offset, 0);
                assert_eq!(available, 3);
            }
            other => panic!("expected truncated header, got {:?}", other),
        }

        let data = chunk(b"TEST", b"abcd");
        assert!(matches!(parse_root(&data[..7]), Err(Error::TruncatedHeader { .. })));
        assert!(matches!(parse_root(&[]), Err(Error::TruncatedHeader { .. })));
    }

    #[test]
    fn test_root_overruns_buffer() {
        let data = chunk_with_length(b"TEST", 100, b"abcd");
        match parse_root(&data) {
            Err(Error::BoundsError { tag, offset, end, bound }) => {
                assert_eq!(tag, "TEST");
                assert_eq!(offset, 0);
                assert_eq!(end, 108);
                assert_eq!(bound, 12);
            }
            other => panic!("expected bounds error, got {:?}", other),
        }
    }

    #[test]
    fn test_child_overruns_parent() {
        // The child claims 16 bytes but its parent only holds 12 bytes of
        // payload; the buffer itself has room because of the trailing sibling.
        let mut payload = chunk_with_length(b"NAME", 16, b"abcd");
        let data_len = payload.len() as u32;
        let mut data = b"MODL".to_vec();
        data.extend_from_slice(&data_len.to_le_bytes());
        data.append(&mut payload);
        data.extend(chunk(b"PAD_", &[0u8; 16]));

        match parse_root(&data) {
            Err(Error::BoundsError { tag, end, bound, .. }) => {
                assert_eq!(tag, "NAME");
                assert_eq!(end, 32);
                assert_eq!(bound, 20);
            }
            other => panic!("expected bounds error, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_child_header() {
        let mut payload = chunk(b"NAME", b"a\0");
        payload.extend_from_slice(b"XYZ");
        let data = chunk(b"SEGM", &payload);
        assert!(matches!(parse_root(&data), Err(Error::TruncatedHeader { .. })));
    }

    #[test]
    fn test_depth_limit() {
        let mut data = chunk(b"NAME", b"deep\0");
        for _ in 0..5 {
            data = chunk(b"MODL", &data);
        }

        let shallow = ParseOptions {
            max_depth: 3,
            ..Default::default()
        };
        assert!(matches!(
            parse_with(&data, 0, &shallow),
            Err(Error::DepthExceeded { depth: 3 })
        ));

        let enough = ParseOptions {
            max_depth: 5,
            ..Default::default()
        };
        assert!(parse_with(&data, 0, &enough).is_ok());
    }

    #[test]
    fn test_children_tile_payload() {
        let mut geom = chunk(b"BBOX", &[0u8; 40]);
        geom.extend(chunk(b"SEGM", &chunk(b"MATI", &0u32.to_le_bytes())));
        let mut payload = chunk(b"MATD", &chunk(b"NAME", b"m\0"));
        payload.extend(chunk(b"GEOM", &geom));
        let data = chunk(b"MODL", &payload);

        let root = parse_root(&data).unwrap();
        for node in root.walk() {
            if node.is_leaf() {
                continue;
            }
            let tiled: usize = node.children().map(|c| c.span_len()).sum();
            assert_eq!(tiled, node.length() as usize, "{}", node.tag());
        }
    }

    #[test]
    fn test_read_header() {
        let data = chunk(b"HEDR", &[0u8; 3]);
        let (header, payload_start) = read_header(&data, 0, data.len()).unwrap();
        assert_eq!(header.tag, "HEDR");
        assert_eq!(header.length.get(), 3);
        assert_eq!(payload_start, 8);

        assert!(matches!(read_header(&data, 0, 7), Err(Error::TruncatedHeader { .. })));
    }

    #[test]
    fn test_deterministic() {
        let mut payload = chunk(b"NAME", b"Foo\0");
        payload.extend(chunk(b"GEOM", &chunk(b"POSL", &[1u8; 24])));
        let data = chunk(b"MODL", &payload);

        let first = parse_root(&data).unwrap();
        let second = parse_root(&data).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_deep_ordered_nesting() {
        let mut data = chunk(b"POSL", &[0u8; 12]);
        for _ in 0..250 {
            data = chunk(b"GEOM", &data);
        }

        let root = parse_root(&data).unwrap();
        assert_eq!(root.walk().count(), 251);
        assert_eq!(root.filter_all(b"POSL").len(), 1);
    }

    #[cfg(feature = "parallel")]
    mod parallel {
        use super::*;

        fn sequential() -> ParseOptions {
            ParseOptions {
                parallel: false,
                ..Default::default()
            }
        }

        fn geom(index: u32, segments: u32) -> Vec<u8> {
            let mut payload = chunk(b"BBOX", &index.to_le_bytes());
            for segment in 0..segments {
                let mut segm = chunk(b"MATI", &segment.to_le_bytes());
                segm.extend(chunk(b"POSL", &[index as u8; 24]));
                payload.extend(chunk(b"SEGM", &segm));
            }
            chunk(b"GEOM", &payload)
        }

        #[test]
        fn test_wide_tree_matches_sequential() {
            let mut msh2 = Vec::new();
            for i in 0..64 {
                // Every sibling is a GEOM; several are byte-identical.
                msh2.extend(geom(i % 8, 1 + i % 3));
            }
            let mut payload = chunk(b"NAME", b"wide\0");
            payload.extend(chunk(b"MSH2", &msh2));
            payload.extend(matl(&vec![chunk(b"MATD", &chunk(b"NAME", b"a\0")); 16]));
            let data = chunk(b"MODL", &payload);

            let fanned = parse_with(&data, 0, &ParseOptions::default()).unwrap();
            let serial = parse_with(&data, 0, &sequential()).unwrap();

            assert_eq!(fanned, serial);
            assert_eq!(fanned.get(b"MSH2").unwrap().child_count(), 64);
            assert_eq!(fanned.to_string(), serial.to_string());
        }

        #[test]
        fn test_malformed_siblings_fail_atomically() {
            // The GEOM headers frame correctly, but a child inside several of
            // them overruns its SEGM.
            let bad_segm = chunk(b"SEGM", &chunk_with_length(b"POSL", 64, &[0u8; 4]));
            let mut msh2 = Vec::new();
            for i in 0..32 {
                if i % 5 == 3 {
                    msh2.extend(chunk(b"GEOM", &bad_segm));
                } else {
                    msh2.extend(geom(i, 2));
                }
            }
            let data = chunk(b"MSH2", &msh2);

            for options in [ParseOptions::default(), sequential()] {
                match parse_with(&data, 0, &options) {
                    Err(Error::BoundsError { tag, .. }) => assert_eq!(tag, "POSL"),
                    other => panic!("expected bounds error, got {:?}", other),
                }
            }
        }
    }
}
