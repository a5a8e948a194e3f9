pub mod lit;

pub use lit::Lit;

/// Renders clauses as space separated DIMACS integers, one clause per line.
pub fn clauses_to_dimacs(num_vars: u32, clauses: &[Vec<Lit>]) -> String {
    let mut out = String::new();
    out.push_str(&format!("p cnf {} {}\n", num_vars, clauses.len()));
    for clause in clauses {
        for &lit in clause {
            out.push_str(&format!("{} ", lit.to_dimacs()));
        }
        out.push_str("0\n");
    }
    out
}
