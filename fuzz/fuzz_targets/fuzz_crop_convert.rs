#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use zenraster::{ColorSpec, Image, convert};

#[derive(Debug, Arbitrary)]
struct Input {
    width: u8,
    height: u8,
    spec: u8,
    crop: (u16, u16, u16, u16),
    target: u8,
    fill: u8,
}

fn spec(selector: u8) -> ColorSpec {
    const SPECS: [ColorSpec; 6] = [
        ColorSpec::GRAY8,
        ColorSpec::GRAY16,
        ColorSpec::RGB8,
        ColorSpec::RGB16,
        ColorSpec::RGBA8,
        ColorSpec::RGBA16,
    ];
    SPECS[selector as usize % SPECS.len()]
}

fuzz_target!(|input: Input| {
    let source_spec = spec(input.spec);
    let (w, h) = (u32::from(input.width), u32::from(input.height));
    let size = source_spec.buffer_size(w, h).unwrap();
    let data = (0..size).map(|i| (i as u8).wrapping_mul(input.fill)).collect();
    let image = Image::from_vec(w, h, source_spec, data).unwrap();

    let (x, y, cw, ch) = input.crop;
    let (x, y, cw, ch) = (u32::from(x), u32::from(y), u32::from(cw), u32::from(ch));
    let crop = image.cropped(x, y, cw, ch);
    assert!(crop.width() <= w.saturating_sub(x));
    assert!(crop.height() <= h.saturating_sub(y));
    assert_eq!(crop.is_valid(), crop.width() > 0 && crop.height() > 0);
    let rows = if crop.is_valid() { crop.height() } else { 0 };
    for row in 0..rows {
        let src = image.row(y + row).unwrap();
        let start = x as usize * source_spec.bytes_per_pixel();
        assert_eq!(crop.row(row).unwrap(), &src[start..start + crop.stride()]);
    }

    let target = spec(input.target);
    match image.converted_to(target) {
        Ok(converted) => {
            assert_eq!(converted.color_spec(), target);
            assert_eq!(converted.data().len(), target.buffer_size(w, h).unwrap());
            if source_spec == target {
                assert_eq!(converted, image);
            }
        }
        Err(_) => assert!(!convert::is_supported(source_spec, target) && source_spec != target),
    }
});
