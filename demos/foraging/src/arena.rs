//! Arena layout: a 24 × 16 room split into four chambers by two partial
//! partitions, each with a doorway.

use std::io::Cursor;

use eco_space::{WallSpec, load_walls_reader};

pub const WIDTH: u32 = 24;
pub const HEIGHT: u32 = 16;

// Vertical partition between columns 11 and 12 (door at rows 7–8),
// horizontal partition between rows 7 and 8 (doors at columns 4 and 19).
const WALLS_CSV: &str = "\
x,y,direction\n\
11,0,E\n\
11,1,E\n\
11,2,E\n\
11,3,E\n\
11,4,E\n\
11,5,E\n\
11,6,E\n\
11,9,E\n\
11,10,E\n\
11,11,E\n\
11,12,E\n\
11,13,E\n\
11,14,E\n\
11,15,E\n\
0,7,S\n\
1,7,S\n\
2,7,S\n\
3,7,S\n\
5,7,south\n\
6,7,south\n\
7,7,south\n\
8,7,south\n\
9,7,south\n\
10,7,south\n\
13,8,N\n\
14,8,N\n\
15,8,N\n\
16,8,N\n\
17,8,N\n\
18,8,N\n\
20,8,N\n\
21,8,N\n\
22,8,N\n\
23,8,N\n\
";

pub fn walls() -> anyhow::Result<Vec<WallSpec>> {
    Ok(load_walls_reader(Cursor::new(WALLS_CSV))?)
}
