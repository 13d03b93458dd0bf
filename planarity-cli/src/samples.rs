// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The bundled sample graphs used by the regression test command when no
//! samples directory is given.

pub const MAX_PLANAR5: &str = "\
N=5
1: 2 3 4 5 0
2: 1 3 5 0
3: 1 2 4 5 0
4: 1 3 5 0
5: 1 2 3 4 0
";

pub const MAX_PLANAR5_ZERO_BASED: &str = "\
N=5
0: 1 2 3 4 -1
1: 0 2 4 -1
2: 0 1 3 4 -1
3: 0 2 4 -1
4: 0 1 2 3 -1
";

pub const PETERSEN: &str = "\
N=10
1: 2 5 6 0
2: 1 3 7 0
3: 2 4 8 0
4: 3 5 9 0
5: 1 4 10 0
6: 1 8 9 0
7: 2 9 10 0
8: 3 6 10 0
9: 4 6 7 0
10: 5 7 8 0
";

pub const PETERSEN_ZERO_BASED: &str = "\
N=10
0: 1 4 5 -1
1: 0 2 6 -1
2: 1 3 7 -1
3: 2 4 8 -1
4: 0 3 9 -1
5: 0 7 8 -1
6: 1 8 9 -1
7: 2 5 9 -1
8: 3 5 6 -1
9: 4 6 7 -1
";

pub const K5: &str = "\
N=5
1: 2 3 4 5 0
2: 1 3 4 5 0
3: 1 2 4 5 0
4: 1 2 3 5 0
5: 1 2 3 4 0
";

pub const K33: &str = "\
N=6
1: 4 5 6 0
2: 4 5 6 0
3: 4 5 6 0
4: 1 2 3 0
5: 1 2 3 0
6: 1 2 3 0
";

pub const DRAW_EXAMPLE: &str = "\
N=4
1: 2 3 4 0
2: 1 3 4 0
3: 1 2 4 0
4: 1 2 3 0
";

/// The bundled samples as (file name, contents) pairs, so an external
/// samples directory can override them by name.
pub const ALL: &[(&str, &str)] = &[
    ("maxPlanar5.txt", MAX_PLANAR5),
    ("maxPlanar5.0-based.txt", MAX_PLANAR5_ZERO_BASED),
    ("Petersen.txt", PETERSEN),
    ("Petersen.0-based.txt", PETERSEN_ZERO_BASED),
    ("K5.txt", K5),
    ("K33.txt", K33),
    ("drawExample.txt", DRAW_EXAMPLE),
];
