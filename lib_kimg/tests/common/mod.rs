#![allow(dead_code)]

use lib_kimg::Color;

pub const GREY_PALETTE: &str = "\
GIMP Palette
Name: Grey 4
Columns: 4
#
  0   0   0\tBlack
 85  85  85\tDark grey
170 170 170\tLight grey
255 255 255\tWhite
";

/// 8x1 image whose color table lists white before black.
pub const INVERTED_HEADER: &str = "\
/*  GIMP header image file format (INDEXED): /tmp/inverted.h  */

static unsigned int width = 8;
static unsigned int height = 1;

/*  Call this macro repeatedly.  After each use, the pixel data can be extracted  */

#define HEADER_PIXEL(data,pixel) {\\
pixel[0] = header_data_cmap[(unsigned char)data[0]][0]; \\
pixel[1] = header_data_cmap[(unsigned char)data[0]][1]; \\
pixel[2] = header_data_cmap[(unsigned char)data[0]][2]; \\
data ++; }

static char header_data_cmap[256][3] = {
\t{255,255,255},
\t{  0,  0,  0},
\t{255,255,255},
\t{255,255,255}
\t};
static unsigned char header_data[] = {
\t1,1,1,1,0,0,0,0
\t};
";

/// Builds a GIMP-style indexed header. Pixel rows are written 16 to a line.
pub fn gimp_header(width: u16, height: u16, colors: &[Color], pixels: &[u8]) -> String {
    let mut text = String::from("/*  GIMP header image file format (INDEXED)  */\n\n");
    text.push_str(&format!("static unsigned int width = {width};\n"));
    text.push_str(&format!("static unsigned int height = {height};\n\n"));
    text.push_str("static char header_data_cmap[256][3] = {\n");
    for color in colors {
        text.push_str(&format!("\t{{{:3},{:3},{:3}}},\n", color.r, color.g, color.b));
    }
    text.push_str("\t};\n");
    text.push_str("static unsigned char header_data[] = {\n");
    for line in pixels.chunks(16) {
        let values: Vec<String> = line.iter().map(|p| p.to_string()).collect();
        text.push_str(&format!("\t{},\n", values.join(",")));
    }
    text.push_str("\t};\n");
    text
}

pub fn grey_colors() -> Vec<Color> {
    vec![
        Color::new(0, 0, 0),
        Color::new(85, 85, 85),
        Color::new(170, 170, 170),
        Color::new(255, 255, 255),
    ]
}

/// Parses one hex record line (leading ':' or ';' dropped) into bytes.
pub fn record_bytes(line: &str) -> Vec<u8> {
    (1..line.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&line[i..i + 2], 16).unwrap())
        .collect()
}
