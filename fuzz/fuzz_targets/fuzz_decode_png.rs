#![no_main]

use libfuzzer_sys::fuzz_target;
use zenraster::{ColorSpec, DecodeRequest, EncodeRequest, ImageFormat, Limits};

const SPECS: [ColorSpec; 6] = [
    ColorSpec::GRAY8,
    ColorSpec::GRAY16,
    ColorSpec::RGB8,
    ColorSpec::RGB16,
    ColorSpec::RGBA8,
    ColorSpec::RGBA16,
];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, png)) = data.split_first() else {
        return;
    };
    let spec = SPECS[selector as usize % SPECS.len()];
    let limits = Limits::none().with_max_pixels(1 << 20).with_max_memory(64 << 20);

    let Ok(image) = DecodeRequest::new()
        .with_format(ImageFormat::Png)
        .with_color_spec(spec)
        .with_limits(&limits)
        .decode_slice(png)
    else {
        return;
    };

    assert_eq!(image.color_spec(), spec);
    assert_eq!(
        image.data().len(),
        spec.buffer_size(image.width(), image.height()).unwrap()
    );

    // Whatever decodes must survive a re-encode.
    let encoded = EncodeRequest::new(ImageFormat::Png)
        .encode_to_vec(&image)
        .expect("re-encode");
    let again = DecodeRequest::new()
        .with_format(ImageFormat::Png)
        .with_color_spec(spec)
        .decode_slice(&encoded)
        .expect("decode re-encoded");
    assert_eq!(again, image);
});
