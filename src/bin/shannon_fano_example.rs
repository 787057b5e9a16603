use shannon_fano_codec::{Error, Table};

fn main() -> Result<(), Error> {
    let text = "abracadabra, a shannon-fano example";

    let table = Table::<char>::from_sequence(text.chars())?;
    println!("shannon-fano table\n{}", table);

    let encoded = table.encode(text.chars())?;
    println!("sequence to encode\n{:?}", text);
    println!(
        "encoded sequence ({} bits)\n{:08X?}",
        encoded.total_bits(),
        encoded.words()
    );

    let decoded: String = encoded.decode(&table)?.into_iter().collect();
    println!("decoded sequence\n{:?}", decoded);

    let ranked = Table::<char>::from_ranked_list("etaoinshrdlu".chars())?;
    println!("table from ranked list\n{}", ranked);
    Ok(())
}
