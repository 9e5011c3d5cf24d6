/*!
# Expressions and Types

There are two types of data: single precision numbers and strings. The
name of a variable decides its type. Names are letters followed by
optional digits. A name ending in `$` holds a string, anything else
holds a number. `A` and `A$` are two different variables.

```text
LET A = 1.5
A$ = "HELLO"
```

`LET` is optional. A variable that was never assigned reads as zero or
as the empty string. Assigning a string to a numeric variable is a
`SYNTAX ERROR`.

## Operators

From loosest to tightest binding.

| Operators | Meaning |
|-----------|---------|
| `AND` `OR` | Logical, result 0 or 1 |
| `=` `<>` `<` `<=` `>` `>=` | Comparison of two numbers or two strings, result 0 or 1 |
| `+` `-` `&` `\|` | Add, subtract, bitwise and, bitwise or |
| `*` `/` `%` | Multiply, divide, modulus |
| `-` | Negate |

`%` works on whole numbers, truncating both sides toward zero first.
`7 % 0` is `inf` rather than an error. `/` is floating point division.

```text
PRINT 2+3*4
14
PRINT 7%3
1
```

## Strings

`+` joins strings. Any string can be followed by a range of characters
to take a piece of it. Positions start at 1.

```text
A$ = "HELLO"
PRINT A$(2 TO 4)
ELL
PRINT A$(3)
LLO
PRINT A$(TO 2) + A$(4 TO)
HELLO
```

A start before 1 counts as 1 and an end past the last character counts
as the last character. A start after the end gives the empty string.
*/
