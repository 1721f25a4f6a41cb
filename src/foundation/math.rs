pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

pub(crate) fn premultiply(px: [u8; 4]) -> [u8; 4] {
    let a = u16::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    [
        mul_div255_u8(u16::from(px[0]), a),
        mul_div255_u8(u16::from(px[1]), a),
        mul_div255_u8(u16::from(px[2]), a),
        px[3],
    ]
}

pub(crate) fn unpremultiply(px: [u8; 4]) -> [u8; 4] {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let un = |c: u8| ((u32::from(c) * 255 + a / 2) / a).min(255) as u8;
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

/// Premultiplied source-over: `dst = src + dst * (1 - src.a)`.
pub(crate) fn src_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let inv = 255 - u16::from(src[3]);
    if inv == 0 {
        return src;
    }
    let ch = |s: u8, d: u8| (u16::from(s) + mul_div255_u16(u16::from(d), inv)).min(255) as u8;
    [
        ch(src[0], dst[0]),
        ch(src[1], dst[1]),
        ch(src[2], dst[2]),
        ch(src[3], dst[3]),
    ]
}

/// Linear blend of two RGBA8 pixels with a weight in `[0, 1]`.
pub(crate) fn lerp_rgba8(a: [u8; 4], b: [u8; 4], t: f64) -> [f64; 4] {
    let mut out = [0.0; 4];
    for (o, (&x, &y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        *o = f64::from(x) + (f64::from(y) - f64::from(x)) * t;
    }
    out
}

pub(crate) fn round_rgba8(v: [f64; 4]) -> [u8; 4] {
    v.map(|c| c.round().clamp(0.0, 255.0) as u8)
}
