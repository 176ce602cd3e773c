#![no_main]
use entropy_codecs::{arithmetic, huffman, range, rle};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let encoded = rle::encode_to_vec(data).unwrap();
    assert_eq!(rle::decode_to_vec(&encoded).unwrap(), data);

    let encoded = huffman::encode_to_vec(data).unwrap();
    assert_eq!(huffman::decode_to_vec(&encoded).unwrap(), data);

    let encoded = arithmetic::encode_to_vec(data).unwrap();
    assert_eq!(arithmetic::decode_to_vec(&encoded).unwrap(), data);

    let encoded = range::encode_to_vec(data).unwrap();
    assert_eq!(range::decode_to_vec(&encoded).unwrap(), data);
});
