// tests/text_formats_test.rs

use std::fs;
use timeline_table::{Column, Table, TableError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("centreLine_U.xy");
        fs::write(&path, "0 3 4 0\n0.5 0 0 2\n1 1 0 0\n").unwrap();

        let t = Table::builder().file(&path).build().unwrap();
        assert_eq!(t.names(), &["coord", "U_x", "U_y", "U_z", "U_mag"]);
        assert_eq!(t.f64_column("U_mag").unwrap(), &[5.0, 2.0, 1.0]);
    }

    #[test]
    fn test_sample_file_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("line_p_T.xy");
        fs::write(&path, "0 1 2 3 4\n").unwrap();

        let err = Table::builder().file(&path).build().unwrap_err();
        assert!(matches!(
            err,
            TableError::SampleColumnMismatch { columns: 5, scalar: 3, vector: 7, .. }
        ));
    }

    #[test]
    fn test_timeline_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p");
        fs::write(&path, "# Time  probe0  probe1\n0 1 2\n0.1 2 3\n# restart\n0.2 3 4\n").unwrap();

        let t = Table::builder()
            .txt_path(&path)
            .valid_names(["probe1"], false)
            .build()
            .unwrap();
        assert_eq!(t.names(), &["Time", "probe1"]);
        assert!(t.eliminated_names().contains("probe0"));
        assert_eq!(t.column("probe1").unwrap(), &Column::F64(vec![2.0, 3.0, 4.0]));
    }

    #[test]
    fn test_recalc_matching_on_text_input() {
        let mut t = Table::builder()
            .txt_str("# t p_a p_b q\n0 1 2 3\n1 2 3 4\n")
            .build()
            .unwrap();
        let done = t.recalc_matching("^p_", "this / 2").unwrap();
        assert_eq!(done.len(), 2);
        assert_eq!(t.f64_column("p_b").unwrap(), &[1.0, 1.5]);
        assert_eq!(t.f64_column("q").unwrap(), &[3.0, 4.0]);
    }

    #[test]
    fn test_regex_name_set_per_group() {
        // each group of a solver log is read with its own pattern set
        let initial = "# Time Ux_initial Uy_initial p_initial\n0 1 2 3\n1 4 5 6\n";
        let finals = "# Time k_final epsilon_final nut\n0 7 8 9\n1 10 11 12\n";

        let velocity = Table::builder()
            .txt_str(initial)
            .valid_names(["^U"], true)
            .build()
            .unwrap();
        assert_eq!(velocity.names(), &["Time", "Ux_initial", "Uy_initial"]);
        assert!(velocity.eliminated_names().contains("p_initial"));

        // patterns are searched anywhere in the name
        let turbulence = Table::builder()
            .txt_str(finals)
            .valid_names(["final"], true)
            .build()
            .unwrap();
        assert_eq!(turbulence.names(), &["Time", "k_final", "epsilon_final"]);

        // without regex matching the same entry must equal a whole name
        let exact = Table::builder()
            .txt_str(finals)
            .valid_names(["final"], false)
            .build()
            .unwrap();
        assert_eq!(exact.names(), &["Time"]);

        let joined = velocity.join(&turbulence, None).unwrap();
        assert_eq!(
            joined.names(),
            &["Time", "Ux_initial", "Uy_initial", "k_final", "epsilon_final"]
        );
        assert_eq!(joined.f64_column("epsilon_final").unwrap(), &[8.0, 11.0]);
    }
}

// tests/text_formats_test.rs
