use tracing::{debug, instrument};

use crate::image_pipeline::nef::bit_writer::BitWriter;
use crate::image_pipeline::nef::code_table;
use crate::image_pipeline::nef::error::{NefEncodeError, Result};
use crate::image_pipeline::nef::predictor::Predictor;
use crate::image_pipeline::nef::types::NefEncodeParams;

/// Free output space required before each row is encoded.
pub const OUTPUT_MARGIN_BYTES: usize = 1024 * 1024;

/// Encodes `source` (raster order, one `u16` per sample) into `output`.
///
/// Each pixel is written as its Huffman-coded magnitude class followed by the
/// delta data bits, with no alignment between pixels. Returns the number of
/// bytes carrying encoded data; the final word's zero padding may sit in
/// `output` beyond that count.
///
/// # Errors
///
/// * `SourceBufferTooSmall` - `source` holds fewer than `rows * columns` samples
/// * `OutputBufferTooSmall` - less than [`OUTPUT_MARGIN_BYTES`] free at the start of a row
/// * `NoHuffmanEntry` - a sample is too far from its prediction for the 14-bit table
#[instrument(level = "debug", skip_all, fields(columns = params.columns, rows = params.rows))]
pub fn encode(params: &NefEncodeParams, source: &[u16], output: &mut [u8]) -> Result<usize> {
    let available = source.len() * std::mem::size_of::<u16>();
    let required = params.source_size_bytes().unwrap_or(usize::MAX);
    if available < required {
        return Err(NefEncodeError::SourceBufferTooSmall {
            required,
            available,
        });
    }

    let mut predictor = Predictor::new(params.starting_predictive_value);
    let mut writer = BitWriter::new(output);

    for row in 0..params.rows {
        let room = writer.capacity().saturating_sub(writer.bytes_stored());
        if room < OUTPUT_MARGIN_BYTES {
            return Err(NefEncodeError::OutputBufferTooSmall {
                required: writer.bytes_stored() + OUTPUT_MARGIN_BYTES,
                capacity: writer.capacity(),
            });
        }

        let start = row * params.columns;
        let samples = &source[start..start + params.columns];

        for (column, &pixel) in samples.iter().enumerate() {
            let delta = predictor.observe(row, column, pixel).map_err(|e| {
                NefEncodeError::NoHuffmanEntry {
                    row,
                    column,
                    class: e.class,
                }
            })?;

            let huff = code_table::lookup(delta.class).ok_or(NefEncodeError::NoHuffmanEntry {
                row,
                column,
                class: delta.class,
            })?;

            writer.append_bits(huff.length, huff.value)?;
            writer.append_bits(delta.class, delta.bits)?;
        }
    }

    writer.flush()?;

    let bytes = writer.bytes_stored();
    debug!(bytes, "NEF encode complete");
    Ok(bytes)
}

/// Encodes into a freshly allocated buffer sized at the source size plus
/// [`OUTPUT_MARGIN_BYTES`], truncated to the encoded length.
pub fn encode_to_vec(params: &NefEncodeParams, source: &[u16]) -> Result<Vec<u8>> {
    let capacity = source.len() * std::mem::size_of::<u16>() + OUTPUT_MARGIN_BYTES;
    let mut output = vec![0u8; capacity];
    let bytes = encode(params, source, &mut output)?;
    output.truncate(bytes);
    Ok(output)
}
