/// Choose between iter and par_iter
#[cfg(not(feature = "parallel"))]
macro_rules! iter {
    ($e:expr) => {
        $e.iter()
    };
}

/// Choose between iter and par_iter
#[cfg(feature = "parallel")]
macro_rules! iter {
    ($e:expr) => {
        $e.par_iter()
    };
}

/// Choose between into_iter and into_par_iter
#[cfg(not(feature = "parallel"))]
macro_rules! into_iter {
    ($e:expr) => {
        $e.into_iter()
    };
}

/// Choose between into_iter and into_par_iter
#[cfg(feature = "parallel")]
macro_rules! into_iter {
    ($e:expr) => {
        $e.into_par_iter()
    };
}

/// Choose between sort_unstable_by and par_sort_unstable_by
#[cfg(not(feature = "parallel"))]
macro_rules! sort_unstable_by {
    ($e:expr, $f:expr) => {
        $e.sort_unstable_by($f)
    };
}

/// Choose between sort_unstable_by and par_sort_unstable_by
#[cfg(feature = "parallel")]
macro_rules! sort_unstable_by {
    ($e:expr, $f:expr) => {
        $e.par_sort_unstable_by($f)
    };
}
